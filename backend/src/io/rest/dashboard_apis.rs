//! # REST API for the Dashboard

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error::ApiError;
use crate::AppState;

pub async fn get_dashboard_stats(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/dashboard/stats");

    match state.dashboard_service.dashboard_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => {
            error!("Failed to compute dashboard stats: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
