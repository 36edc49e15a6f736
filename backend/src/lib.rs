//! # SantaCloud Backend
//!
//! Everything behind the SantaCloud HTTP API:
//! - **Domain**: child, gift, reindeer and letter rules, the dashboard
//!   reporter, the reindeer status simulator and the reply generator
//! - **Storage**: the record store contract with in-memory and YAML file
//!   implementations
//! - **IO**: the REST handlers
//!
//! ## Architecture
//!
//! ```text
//! HTTP clients
//!     ↓
//! IO Layer (REST handlers)
//!     ↓
//! Domain Layer (services, simulator, reply generator)
//!     ↓
//! Storage Layer (RecordStore)
//! ```
//!
//! The simulator scheduler runs beside the request path and writes the
//! reindeer collection directly.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::config::BackendConfig;
use crate::domain::{
    ChildService, DashboardService, GiftService, HttpTextGenerator, LetterService,
    ReindeerService, ReplyGenerator, SimulationTables, SimulatorScheduler, StatusSimulator,
    TextGenerator,
};
use crate::storage::{
    seed_default_reindeers, FileStore, MemoryStore, RecordStore, Repository, YamlConnection,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub gift_service: GiftService,
    pub reindeer_service: ReindeerService,
    pub letter_service: LetterService,
    pub dashboard_service: DashboardService,
    pub simulator: SimulatorScheduler,
    pub cors_origin: Option<HeaderValue>,
}

/// Initialize the backend with all required services.
///
/// The simulator is constructed but not started; call
/// [`SimulatorScheduler::start`] on `state.simulator` to run it on a timer.
pub async fn initialize_backend(config: BackendConfig) -> Result<AppState> {
    let store: Arc<dyn RecordStore> = match &config.data_dir {
        Some(dir) => {
            info!("Setting up YAML record store in {}", dir.display());
            let connection = YamlConnection::new(dir)
                .await
                .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
            Arc::new(FileStore::new(connection))
        }
        None => {
            info!("Setting up in-memory record store");
            Arc::new(MemoryStore::new())
        }
    };

    initialize_with_store(store, config).await
}

/// Same as [`initialize_backend`] over an already constructed store
pub async fn initialize_with_store(
    store: Arc<dyn RecordStore>,
    config: BackendConfig,
) -> Result<AppState> {
    if config.seed_reindeers {
        seed_default_reindeers(&Repository::new(store.clone()))
            .await
            .context("Failed to seed reindeer")?;
    }

    let text_generator: Option<Arc<dyn TextGenerator>> = match &config.text_generation_url {
        Some(url) => {
            info!("Letter replies via text generation at {}", url);
            Some(Arc::new(HttpTextGenerator::new(
                url.clone(),
                config.text_generation_timeout,
            )?))
        }
        None => {
            info!("No text generation endpoint configured, using canned replies");
            None
        }
    };

    let cors_origin = config
        .cors_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()
        .context("Invalid CORS origin")?;

    info!("Setting up domain model");
    let simulator = SimulatorScheduler::new(
        StatusSimulator::new(store.clone(), SimulationTables::default())?,
        config.simulator_interval,
        config.simulator_seed,
    );

    Ok(AppState {
        child_service: ChildService::new(store.clone()),
        gift_service: GiftService::new(store.clone()),
        reindeer_service: ReindeerService::new(store.clone()),
        letter_service: LetterService::new(store.clone(), ReplyGenerator::new(text_generator)),
        dashboard_service: DashboardService::new(store),
        simulator,
        cors_origin,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    let allow_origin = match app_state.cors_origin.clone() {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::from(Any),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/children", get(io::list_children).post(io::create_child))
        .route("/children/:id", get(io::get_child))
        .route("/gifts", get(io::list_gifts))
        .route("/gifts/progress", get(io::get_gift_progress))
        .route("/gifts/:id", get(io::get_gift).put(io::update_gift_status))
        .route("/reindeers", get(io::list_reindeers))
        .route("/reindeers/simulate", post(io::simulate_reindeers))
        .route(
            "/reindeers/:id",
            get(io::get_reindeer).put(io::update_reindeer_status),
        )
        .route("/letters", get(io::list_letters).post(io::create_letter))
        .route("/letters/reply", post(io::generate_reply))
        .route("/letters/:id", get(io::get_letter))
        .route("/dashboard/stats", get(io::get_dashboard_stats));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
