use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::storage::{Document, RecordStore, Repository};
use shared::{Gift, GiftProgressStat, GiftStatus};

/// Service for gift listing, status changes and workshop progress
#[derive(Clone)]
pub struct GiftService {
    gifts: Repository<Gift>,
}

impl GiftService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            gifts: Repository::new(store),
        }
    }

    pub async fn list_gifts(&self) -> DomainResult<Vec<Gift>> {
        let mut gifts = self.gifts.scan().await?;
        gifts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(gifts)
    }

    pub async fn get_gift(&self, gift_id: &str) -> DomainResult<Gift> {
        self.gifts
            .get(gift_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Gift", gift_id))
    }

    /// Move a gift to any status. Transitions are not checked against the
    /// pipeline order; a gift may go from delivered back to wrapping.
    pub async fn update_gift_status(&self, gift_id: &str, status: GiftStatus) -> DomainResult<Gift> {
        info!("Updating gift {} to status {}", gift_id, status);

        let mut fields = Document::new();
        fields.insert("status".to_string(), json!(status));

        match self.gifts.update(gift_id, fields).await? {
            Some(gift) => Ok(gift),
            None => {
                warn!("Gift not found: {}", gift_id);
                Err(DomainError::not_found("Gift", gift_id))
            }
        }
    }

    /// Count of gifts per status, in pipeline order, with chart colours
    pub async fn gift_progress(&self) -> DomainResult<Vec<GiftProgressStat>> {
        let gifts = self.gifts.scan().await?;

        Ok(GiftStatus::ALL
            .into_iter()
            .map(|status| GiftProgressStat {
                label: progress_label(status).to_string(),
                value: gifts.iter().filter(|g| g.status == status).count(),
                color: progress_color(status).to_string(),
            })
            .collect())
    }
}

fn progress_label(status: GiftStatus) -> &'static str {
    match status {
        GiftStatus::Manufacturing => "Manufacturing",
        GiftStatus::Wrapping => "Wrapping",
        GiftStatus::Ready => "Ready",
        GiftStatus::Delivered => "Delivered",
    }
}

fn progress_color(status: GiftStatus) -> &'static str {
    match status {
        GiftStatus::Manufacturing => "hsl(38 92% 50%)",
        GiftStatus::Wrapping => "hsl(0 76% 42%)",
        GiftStatus::Ready => "hsl(144 61% 20%)",
        GiftStatus::Delivered => "hsl(142 76% 36%)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use shared::GiftPriority;

    async fn setup_test(statuses: &[GiftStatus]) -> GiftService {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let repo = Repository::<Gift>::new(store.clone());
        for (index, status) in statuses.iter().enumerate() {
            repo.put(&Gift {
                id: Gift::generate_id("kid", index),
                child_id: "kid".to_string(),
                child_name: "Kid".to_string(),
                gift_name: format!("Gift {}", index),
                status: *status,
                priority: GiftPriority::Low,
            })
            .await
            .unwrap();
        }
        GiftService::new(store)
    }

    #[tokio::test]
    async fn test_update_gift_status_allows_any_jump() {
        let service = setup_test(&[GiftStatus::Manufacturing]).await;

        let delivered = service
            .update_gift_status("kid-0", GiftStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(delivered.status, GiftStatus::Delivered);
        assert_eq!(delivered.gift_name, "Gift 0");

        let back = service
            .update_gift_status("kid-0", GiftStatus::Wrapping)
            .await
            .unwrap();
        assert_eq!(back.status, GiftStatus::Wrapping);
        assert_eq!(service.get_gift("kid-0").await.unwrap().status, GiftStatus::Wrapping);
    }

    #[tokio::test]
    async fn test_update_missing_gift() {
        let service = setup_test(&[]).await;
        let result = service.update_gift_status("nope", GiftStatus::Ready).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(service.list_gifts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gift_progress_counts() {
        let service = setup_test(&[
            GiftStatus::Manufacturing,
            GiftStatus::Manufacturing,
            GiftStatus::Ready,
            GiftStatus::Delivered,
        ])
        .await;

        let progress = service.gift_progress().await.unwrap();
        let summary: Vec<(&str, usize)> = progress
            .iter()
            .map(|stat| (stat.label.as_str(), stat.value))
            .collect();
        assert_eq!(
            summary,
            vec![("Manufacturing", 2), ("Wrapping", 0), ("Ready", 1), ("Delivered", 1)]
        );
        assert_eq!(progress[0].color, "hsl(38 92% 50%)");
    }
}
