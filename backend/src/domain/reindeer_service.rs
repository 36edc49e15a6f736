use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::storage::{Document, RecordStore, Repository};
use shared::{Reindeer, ReindeerStatus};

/// Service for reading reindeer and manual status changes
#[derive(Clone)]
pub struct ReindeerService {
    reindeers: Repository<Reindeer>,
}

impl ReindeerService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            reindeers: Repository::new(store),
        }
    }

    pub async fn list_reindeers(&self) -> DomainResult<Vec<Reindeer>> {
        let mut reindeers = self.reindeers.scan().await?;
        reindeers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(reindeers)
    }

    pub async fn get_reindeer(&self, reindeer_id: &str) -> DomainResult<Reindeer> {
        self.reindeers
            .get(reindeer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reindeer", reindeer_id))
    }

    /// Set the status only; location and energy keep their values until the
    /// simulator next moves this reindeer
    pub async fn update_reindeer_status(
        &self,
        reindeer_id: &str,
        status: ReindeerStatus,
    ) -> DomainResult<Reindeer> {
        info!("Updating reindeer {} to status {}", reindeer_id, status);

        let mut fields = Document::new();
        fields.insert("status".to_string(), json!(status));

        match self.reindeers.update(reindeer_id, fields).await? {
            Some(reindeer) => Ok(reindeer),
            None => {
                warn!("Reindeer not found: {}", reindeer_id);
                Err(DomainError::not_found("Reindeer", reindeer_id))
            }
        }
    }
}
