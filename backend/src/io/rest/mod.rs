//! # REST API Interface Layer
//!
//! HTTP endpoints for SantaCloud, all nested under `/api`.
//!
//! ## Endpoints
//!
//! - `GET|POST /children`, `GET /children/:id` (`?query=` searches name and country)
//! - `GET /gifts`, `GET /gifts/progress`, `GET|PUT /gifts/:id`
//! - `GET /reindeers`, `GET|PUT /reindeers/:id`, `POST /reindeers/simulate`
//! - `GET|POST /letters`, `GET /letters/:id`, `POST /letters/reply`
//! - `GET /dashboard/stats`
//!
//! Domain errors map to 404 (not found), 400 (validation) and 503 (store
//! failure, retryable).

pub mod child_apis;
pub mod dashboard_apis;
pub mod error;
pub mod gift_apis;
pub mod letter_apis;
pub mod reindeer_apis;

pub use child_apis::*;
pub use dashboard_apis::*;
pub use error::ApiError;
pub use gift_apis::*;
pub use letter_apis::*;
pub use reindeer_apis::*;
