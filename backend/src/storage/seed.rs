use shared::{Reindeer, ReindeerStatus};
use tracing::info;

use super::repository::Repository;
use super::traits::StoreResult;

/// The sleigh team written on first start
pub const DEFAULT_REINDEER_NAMES: [&str; 9] = [
    "Dasher", "Dancer", "Prancer", "Vixen", "Comet", "Cupid", "Donner", "Blitzen", "Rudolph",
];

const SEED_LOCATION: &str = "North Pole Stable";

/// Write the default herd if the reindeer collection is empty.
/// Returns the number of reindeer written.
pub async fn seed_default_reindeers(reindeers: &Repository<Reindeer>) -> StoreResult<usize> {
    if !reindeers.scan().await?.is_empty() {
        return Ok(0);
    }

    for name in DEFAULT_REINDEER_NAMES {
        let reindeer = Reindeer {
            id: name.to_lowercase(),
            name: name.to_string(),
            status: ReindeerStatus::Resting,
            location: SEED_LOCATION.to_string(),
            energy_level: 100,
        };
        reindeers.put(&reindeer).await?;
    }

    info!("Seeded {} reindeer", DEFAULT_REINDEER_NAMES.len());
    Ok(DEFAULT_REINDEER_NAMES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, RecordStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let reindeers = Repository::<Reindeer>::new(store);

        assert_eq!(seed_default_reindeers(&reindeers).await.unwrap(), 9);
        assert_eq!(seed_default_reindeers(&reindeers).await.unwrap(), 0);

        let all = reindeers.scan().await.unwrap();
        assert_eq!(all.len(), 9);
        assert!(all.iter().all(|r| r.status == ReindeerStatus::Resting && r.energy_level == 100));

        let rudolph = reindeers.get("rudolph").await.unwrap().unwrap();
        assert_eq!(rudolph.name, "Rudolph");
    }
}
