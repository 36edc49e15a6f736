use std::sync::Arc;
use tracing::debug;

use crate::domain::error::DomainResult;
use crate::storage::{RecordStore, Repository};
use shared::{Child, DashboardStats, Gift, GiftStatus, Letter, Reindeer};

/// Aggregate reporter; every call recomputes from full scans
#[derive(Clone)]
pub struct DashboardService {
    children: Repository<Child>,
    gifts: Repository<Gift>,
    reindeers: Repository<Reindeer>,
    letters: Repository<Letter>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            children: Repository::new(store.clone()),
            gifts: Repository::new(store.clone()),
            reindeers: Repository::new(store.clone()),
            letters: Repository::new(store),
        }
    }

    pub async fn dashboard_stats(&self) -> DomainResult<DashboardStats> {
        let (children, gifts, reindeers, letters) = tokio::try_join!(
            self.children.scan(),
            self.gifts.scan(),
            self.reindeers.scan(),
            self.letters.scan(),
        )?;

        let nice_children = children.iter().filter(|c| c.is_nice()).count();
        let gifts_ready = gifts.iter().filter(|g| g.status == GiftStatus::Ready).count();

        let stats = DashboardStats {
            total_children: children.len(),
            nice_children,
            naughty_children: children.len() - nice_children,
            gifts_ready,
            // Delivered gifts are counted here too
            gifts_in_progress: gifts.len() - gifts_ready,
            active_reindeers: reindeers.iter().filter(|r| r.status.is_active()).count(),
            unread_letters: letters.iter().filter(|l| !l.replied).count(),
        };

        debug!("Dashboard stats: {:?}", stats);
        Ok(stats)
    }
}
