//! # REST API for Reindeer
//!
//! Reads, manual status changes, and an on-demand simulator pass.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error::ApiError;
use crate::AppState;
use shared::UpdateReindeerStatusRequest;

pub async fn list_reindeers(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/reindeers");

    match state.reindeer_service.list_reindeers().await {
        Ok(reindeers) => (StatusCode::OK, Json(reindeers)).into_response(),
        Err(e) => {
            error!("Failed to list reindeers: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_reindeer(
    State(state): State<AppState>,
    Path(reindeer_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reindeers/{}", reindeer_id);

    match state.reindeer_service.get_reindeer(&reindeer_id).await {
        Ok(reindeer) => (StatusCode::OK, Json(reindeer)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Set a reindeer's status; location and energy are left alone
pub async fn update_reindeer_status(
    State(state): State<AppState>,
    Path(reindeer_id): Path<String>,
    Json(request): Json<UpdateReindeerStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/reindeers/{} - status: {}", reindeer_id, request.status);

    match state
        .reindeer_service
        .update_reindeer_status(&reindeer_id, request.status)
        .await
    {
        Ok(reindeer) => (StatusCode::OK, Json(reindeer)).into_response(),
        Err(e) => {
            error!("Failed to update reindeer {}: {}", reindeer_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Run one simulator pass now and return its report
pub async fn simulate_reindeers(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/reindeers/simulate");

    match state.simulator.trigger().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Manual simulation pass failed: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
