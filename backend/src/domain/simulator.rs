//! # Reindeer Status Simulator
//!
//! Periodically moves every reindeer through a small Markov chain:
//!
//! 1. draw the next status from the current status's transition row
//! 2. pick a location uniformly from the new status's candidate list
//! 3. apply an energy delta drawn from the new status's range, clamped to
//!    `[0, 100]` and rounded
//!
//! The tables are plain immutable values and every random draw goes through
//! an injected [`Rng`], so runs are reproducible under a seeded `StdRng`.
//! Persistence goes straight to the reindeer collection; the simulator does
//! not take any lock against concurrent writers.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::domain::error::DomainResult;
use crate::storage::{Document, RecordStore, Repository};
use shared::{RecordFailure, Reindeer, ReindeerStatus, ReindeerTransition, SimulationReport};

const PROBABILITY_TOLERANCE: f64 = 1e-6;
const MAX_ENERGY: f64 = 100.0;

/// One value per reindeer status
#[derive(Debug, Clone, PartialEq)]
pub struct PerStatus<T> {
    pub resting: T,
    pub training: T,
    pub flying: T,
}

impl<T> PerStatus<T> {
    pub fn get(&self, status: ReindeerStatus) -> &T {
        match status {
            ReindeerStatus::Resting => &self.resting,
            ReindeerStatus::Training => &self.training,
            ReindeerStatus::Flying => &self.flying,
        }
    }
}

/// Half-open energy delta range `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRange {
    pub min: f64,
    pub max: f64,
}

impl EnergyRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("Transition row for {status} sums to {sum}, expected 1")]
    RowSum { status: ReindeerStatus, sum: f64 },
    #[error("Transition row for {status} has an invalid probability")]
    InvalidProbability { status: ReindeerStatus },
    #[error("No locations configured for {status}")]
    NoLocations { status: ReindeerStatus },
    #[error("Energy range for {status} is empty or inverted")]
    InvalidEnergyRange { status: ReindeerStatus },
}

/// Fixed configuration driving the simulator
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationTables {
    /// Probability of moving to each status, in `ReindeerStatus::ALL` order
    pub transitions: PerStatus<[f64; 3]>,
    pub locations: PerStatus<Vec<String>>,
    /// Energy delta applied after moving into a status
    pub energy: PerStatus<EnergyRange>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for SimulationTables {
    fn default() -> Self {
        Self {
            transitions: PerStatus {
                resting: [0.7, 0.2, 0.1],
                training: [0.3, 0.5, 0.2],
                flying: [0.4, 0.3, 0.3],
            },
            locations: PerStatus {
                resting: names(&["North Pole Stable", "Reindeer Rest Area", "Cozy Barn", "Warm Lodge"]),
                training: names(&[
                    "Training Grounds",
                    "Obstacle Course",
                    "Flight Simulator",
                    "Strength Training Area",
                    "Agility Field",
                ]),
                flying: names(&[
                    "Test Route Alpha",
                    "Test Route Beta",
                    "Speed Test Track",
                    "Endurance Circuit",
                    "Navigation Challenge",
                ]),
            },
            energy: PerStatus {
                resting: EnergyRange::new(2.0, 7.0),
                training: EnergyRange::new(-4.0, -1.0),
                flying: EnergyRange::new(-8.0, -3.0),
            },
        }
    }
}

impl SimulationTables {
    pub fn validate(&self) -> Result<(), TableError> {
        for status in ReindeerStatus::ALL {
            let row = self.transitions.get(status);
            if row.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(TableError::InvalidProbability { status });
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                return Err(TableError::RowSum { status, sum });
            }

            if self.locations.get(status).is_empty() {
                return Err(TableError::NoLocations { status });
            }

            let range = self.energy.get(status);
            if !range.min.is_finite() || !range.max.is_finite() || range.min >= range.max {
                return Err(TableError::InvalidEnergyRange { status });
            }
        }
        Ok(())
    }
}

/// Draw the next status: the first status, in `ReindeerStatus::ALL` order,
/// whose cumulative probability reaches the draw. Stays put if rounding
/// leaves the draw above the row total.
pub fn next_status<R: Rng + ?Sized>(
    tables: &SimulationTables,
    current: ReindeerStatus,
    rng: &mut R,
) -> ReindeerStatus {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (status, probability) in ReindeerStatus::ALL.into_iter().zip(tables.transitions.get(current)) {
        cumulative += probability;
        if draw <= cumulative {
            return status;
        }
    }
    current
}

pub fn pick_location<'a, R: Rng + ?Sized>(
    tables: &'a SimulationTables,
    status: ReindeerStatus,
    rng: &mut R,
) -> Option<&'a str> {
    tables.locations.get(status).choose(rng).map(String::as_str)
}

pub fn next_energy<R: Rng + ?Sized>(
    tables: &SimulationTables,
    status: ReindeerStatus,
    current: u8,
    rng: &mut R,
) -> u8 {
    let range = tables.energy.get(status);
    let delta = if range.min < range.max {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    };
    let energy = (f64::from(current) + delta).clamp(0.0, MAX_ENERGY).round();
    energy as u8
}

/// Compute one reindeer's next state without touching storage
pub fn advance<R: Rng + ?Sized>(
    tables: &SimulationTables,
    reindeer: &Reindeer,
    rng: &mut R,
) -> ReindeerTransition {
    let status = next_status(tables, reindeer.status, rng);
    let location = pick_location(tables, status, rng)
        .unwrap_or(&reindeer.location)
        .to_string();
    let energy_level = next_energy(tables, status, reindeer.energy_level, rng);

    ReindeerTransition {
        id: reindeer.id.clone(),
        name: reindeer.name.clone(),
        previous_status: reindeer.status,
        status,
        previous_location: reindeer.location.clone(),
        location,
        previous_energy_level: reindeer.energy_level,
        energy_level,
    }
}

/// Applies one simulation pass to every stored reindeer
#[derive(Clone)]
pub struct StatusSimulator {
    reindeers: Repository<Reindeer>,
    tables: Arc<SimulationTables>,
}

impl StatusSimulator {
    /// Build a simulator over `store`. Rejects tables that would let a pass
    /// draw from a malformed distribution.
    pub fn new(store: Arc<dyn RecordStore>, tables: SimulationTables) -> Result<Self, TableError> {
        tables.validate()?;
        Ok(Self {
            reindeers: Repository::new(store),
            tables: Arc::new(tables),
        })
    }

    pub fn tables(&self) -> &SimulationTables {
        &self.tables
    }

    /// Run one pass. Fails only if the initial scan fails; a reindeer whose
    /// update fails, or that disappeared after the scan, is reported in
    /// `failures` and the pass continues with the rest.
    pub async fn run_once<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> DomainResult<SimulationReport> {
        let reindeers = self.reindeers.scan().await?;
        info!("Simulating {} reindeers", reindeers.len());

        let transitions: Vec<ReindeerTransition> = reindeers
            .iter()
            .map(|reindeer| advance(&self.tables, reindeer, &mut *rng))
            .collect();

        let mut report = SimulationReport::default();
        for transition in transitions {
            let mut fields = Document::new();
            fields.insert("status".to_string(), json!(transition.status));
            fields.insert("location".to_string(), json!(transition.location));
            fields.insert("energyLevel".to_string(), json!(transition.energy_level));

            match self.reindeers.update(&transition.id, fields).await {
                Ok(Some(_)) => {
                    info!(
                        "{}: {} -> {}, {} -> {}, energy {} -> {}",
                        transition.name,
                        transition.previous_status,
                        transition.status,
                        transition.previous_location,
                        transition.location,
                        transition.previous_energy_level,
                        transition.energy_level
                    );
                    report.updated.push(transition);
                }
                Ok(None) => {
                    warn!("Reindeer {} vanished during simulation", transition.id);
                    report.failures.push(RecordFailure {
                        id: transition.id,
                        error: "record no longer exists".to_string(),
                    });
                }
                Err(e) => {
                    error!("Failed to update reindeer {}: {}", transition.id, e);
                    report.failures.push(RecordFailure {
                        id: transition.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Simulation pass complete: {} updated, {} failed",
            report.updated.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

/// Drives [`StatusSimulator`] on a fixed interval.
///
/// Scheduled ticks and manual [`trigger`](Self::trigger) calls share one
/// seeded RNG behind a mutex, so they never overlap with each other.
#[derive(Clone)]
pub struct SimulatorScheduler {
    simulator: StatusSimulator,
    rng: Arc<Mutex<StdRng>>,
    interval: Duration,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SimulatorScheduler {
    pub fn new(simulator: StatusSimulator, interval: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            simulator,
            rng: Arc::new(Mutex::new(rng)),
            interval,
            task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one pass now
    pub async fn trigger(&self) -> DomainResult<SimulationReport> {
        let mut rng = self.rng.lock().await;
        self.simulator.run_once(&mut *rng).await
    }

    /// Start the periodic loop. The first pass runs one interval from now;
    /// ticks missed while a pass is still running are skipped.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Reindeer simulator already running");
            return;
        }
        if self.interval.is_zero() {
            warn!("Reindeer simulator interval is zero, not starting");
            return;
        }

        info!("Starting reindeer simulator (interval: {:?})", self.interval);

        let scheduler = self.clone();
        *task = Some(tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(Instant::now() + scheduler.interval, scheduler.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                debug!("Reindeer simulator tick");

                if let Err(e) = scheduler.trigger().await {
                    error!("Reindeer simulation pass failed: {}", e);
                }
            }
        }));
    }

    pub async fn stop(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
            info!("Stopped reindeer simulator");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::storage::{
        seed_default_reindeers, Collection, MemoryStore, StoreError, StoreResult,
    };
    use async_trait::async_trait;

    fn reindeer(id: &str, status: ReindeerStatus, energy_level: u8) -> Reindeer {
        Reindeer {
            id: id.to_string(),
            name: id.to_string(),
            status,
            location: "North Pole Stable".to_string(),
            energy_level,
        }
    }

    /// Wraps a memory store and fails selected operations
    struct FaultyStore {
        inner: MemoryStore,
        fail_update_for: Option<&'static str>,
        fail_scan: bool,
    }

    #[async_trait]
    impl RecordStore for FaultyStore {
        async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
            self.inner.get(collection, id).await
        }

        async fn put(&self, collection: Collection, document: Document) -> StoreResult<()> {
            self.inner.put(collection, document).await
        }

        async fn scan(&self, collection: Collection) -> StoreResult<Vec<Document>> {
            if self.fail_scan {
                return Err(StoreError::Io(std::io::Error::other("scan refused")));
            }
            self.inner.scan(collection).await
        }

        async fn update(
            &self,
            collection: Collection,
            id: &str,
            fields: Document,
        ) -> StoreResult<Option<Document>> {
            if self.fail_update_for == Some(id) {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.update(collection, id, fields).await
        }
    }

    #[test]
    fn test_default_tables_are_valid() {
        assert_eq!(SimulationTables::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut tables = SimulationTables::default();
        tables.transitions.training = [0.5, 0.5, 0.5];
        assert!(matches!(tables.validate(), Err(TableError::RowSum { .. })));

        let mut tables = SimulationTables::default();
        tables.transitions.flying = [1.2, -0.1, -0.1];
        assert!(matches!(tables.validate(), Err(TableError::InvalidProbability { .. })));

        let mut tables = SimulationTables::default();
        tables.locations.flying.clear();
        assert_eq!(
            tables.validate(),
            Err(TableError::NoLocations {
                status: ReindeerStatus::Flying
            })
        );

        let mut tables = SimulationTables::default();
        tables.energy.resting = EnergyRange::new(7.0, 2.0);
        assert!(matches!(tables.validate(), Err(TableError::InvalidEnergyRange { .. })));
    }

    #[test]
    fn test_simulator_rejects_invalid_tables() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());

        let mut tables = SimulationTables::default();
        tables.energy.flying = EnergyRange::new(f64::NAN, -3.0);
        assert!(matches!(
            StatusSimulator::new(store.clone(), tables),
            Err(TableError::InvalidEnergyRange {
                status: ReindeerStatus::Flying
            })
        ));

        let mut tables = SimulationTables::default();
        tables.energy.training = EnergyRange::new(-1.0, -4.0);
        assert!(StatusSimulator::new(store.clone(), tables).is_err());

        let mut tables = SimulationTables::default();
        tables.transitions.resting = [0.7, 0.2, 0.2];
        assert!(matches!(
            StatusSimulator::new(store.clone(), tables),
            Err(TableError::RowSum { .. })
        ));

        assert!(StatusSimulator::new(store, SimulationTables::default()).is_ok());
    }

    #[test]
    fn test_next_status_converges_to_table() {
        let tables = SimulationTables::default();
        let mut rng = StdRng::seed_from_u64(2024);
        const DRAWS: usize = 100_000;

        for current in ReindeerStatus::ALL {
            let mut counts = [0usize; 3];
            for _ in 0..DRAWS {
                let next = next_status(&tables, current, &mut rng);
                let index = ReindeerStatus::ALL
                    .iter()
                    .position(|s| *s == next)
                    .expect("status is one of the three");
                counts[index] += 1;
            }

            for (index, expected) in tables.transitions.get(current).iter().enumerate() {
                let observed = counts[index] as f64 / DRAWS as f64;
                assert!(
                    (observed - expected).abs() < 0.01,
                    "{} -> {}: observed {}, expected {}",
                    current,
                    ReindeerStatus::ALL[index],
                    observed,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_next_status_falls_back_to_current() {
        let mut tables = SimulationTables::default();
        // Row deliberately short of 1 so high draws fall through
        tables.transitions.training = [0.0, 0.0, 0.0];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(
                next_status(&tables, ReindeerStatus::Training, &mut rng),
                ReindeerStatus::Training
            );
        }
    }

    #[test]
    fn test_energy_stays_in_bounds() {
        let tables = SimulationTables::default();
        let mut rng = StdRng::seed_from_u64(99);

        for start in [0u8, 1, 50, 99, 100] {
            let mut current = reindeer("dasher", ReindeerStatus::Resting, start);
            for _ in 0..2_000 {
                let transition = advance(&tables, &current, &mut rng);
                assert!(transition.energy_level <= 100);
                assert!(tables
                    .locations
                    .get(transition.status)
                    .contains(&transition.location));
                current.status = transition.status;
                current.location = transition.location;
                current.energy_level = transition.energy_level;
            }
        }
    }

    #[test]
    fn test_energy_delta_ranges() {
        let tables = SimulationTables::default();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..1_000 {
            let resting = next_energy(&tables, ReindeerStatus::Resting, 50, &mut rng);
            assert!((52..=57).contains(&resting), "resting gave {}", resting);

            let training = next_energy(&tables, ReindeerStatus::Training, 50, &mut rng);
            assert!((46..=49).contains(&training), "training gave {}", training);

            let flying = next_energy(&tables, ReindeerStatus::Flying, 50, &mut rng);
            assert!((42..=47).contains(&flying), "flying gave {}", flying);
        }

        assert_eq!(next_energy(&tables, ReindeerStatus::Resting, 100, &mut rng), 100);
        assert_eq!(next_energy(&tables, ReindeerStatus::Flying, 2, &mut rng), 0);
    }

    #[tokio::test]
    async fn test_run_once_single_reindeer() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let repo = Repository::<Reindeer>::new(store.clone());
        repo.put(&reindeer("rudolph", ReindeerStatus::Resting, 50))
            .await
            .unwrap();

        let simulator = StatusSimulator::new(store, SimulationTables::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let report = simulator.run_once(&mut rng).await.unwrap();

        assert!(report.failures.is_empty());
        assert_eq!(report.updated.len(), 1);

        let stored = repo.get("rudolph").await.unwrap().unwrap();
        let tables = simulator.tables();
        assert!(tables.locations.get(stored.status).contains(&stored.location));

        let range = tables.energy.get(stored.status);
        let delta = f64::from(stored.energy_level) - 50.0;
        assert!(delta >= range.min.floor() && delta <= range.max.ceil());
        assert_ne!(stored.energy_level, 50);

        let transition = &report.updated[0];
        assert_eq!(transition.previous_energy_level, 50);
        assert_eq!(transition.energy_level, stored.energy_level);
        assert_eq!(transition.status, stored.status);
    }

    #[tokio::test]
    async fn test_run_once_isolates_record_failures() {
        let faulty: Arc<dyn RecordStore> = Arc::new(FaultyStore {
            inner: MemoryStore::new(),
            fail_update_for: Some("comet"),
            fail_scan: false,
        });
        let seeded = seed_default_reindeers(&Repository::new(faulty.clone()))
            .await
            .unwrap();

        let simulator = StatusSimulator::new(faulty, SimulationTables::default()).unwrap();
        let report = simulator
            .run_once(&mut StdRng::seed_from_u64(8))
            .await
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "comet");
        assert!(report.failures[0].error.contains("disk full"));
        assert_eq!(report.updated.len(), seeded - 1);
    }

    #[tokio::test]
    async fn test_run_once_scan_failure() {
        let faulty: Arc<dyn RecordStore> = Arc::new(FaultyStore {
            inner: MemoryStore::new(),
            fail_update_for: None,
            fail_scan: true,
        });
        let simulator = StatusSimulator::new(faulty, SimulationTables::default()).unwrap();
        let result = simulator.run_once(&mut StdRng::seed_from_u64(1)).await;
        assert!(matches!(result, Err(DomainError::Store(_))));
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        async fn run(seed: u64) -> SimulationReport {
            let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
            seed_default_reindeers(&Repository::new(store.clone()))
                .await
                .unwrap();
            let scheduler = SimulatorScheduler::new(
                StatusSimulator::new(store, SimulationTables::default()).unwrap(),
                Duration::from_secs(60),
                Some(seed),
            );
            scheduler.trigger().await.unwrap()
        }

        assert_eq!(run(17).await, run(17).await);
    }

    #[tokio::test]
    async fn test_scheduler_start_stop() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let scheduler = SimulatorScheduler::new(
            StatusSimulator::new(store, SimulationTables::default()).unwrap(),
            Duration::from_secs(3600),
            Some(1),
        );

        assert!(!scheduler.is_running().await);
        scheduler.start().await;
        assert!(scheduler.is_running().await);

        // Starting twice keeps a single loop
        scheduler.start().await;
        assert!(scheduler.is_running().await);

        scheduler.stop().await;
        assert!(!scheduler.is_running().await);
    }

    #[tokio::test]
    async fn test_scheduler_zero_interval_does_not_start() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let scheduler = SimulatorScheduler::new(
            StatusSimulator::new(store, SimulationTables::default()).unwrap(),
            Duration::ZERO,
            None,
        );
        scheduler.start().await;
        assert!(!scheduler.is_running().await);
    }
}
