//! # REST API for Gifts

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error::ApiError;
use crate::AppState;
use shared::UpdateGiftStatusRequest;

pub async fn list_gifts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/gifts");

    match state.gift_service.list_gifts().await {
        Ok(gifts) => (StatusCode::OK, Json(gifts)).into_response(),
        Err(e) => {
            error!("Failed to list gifts: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/gifts/{}", gift_id);

    match state.gift_service.get_gift(&gift_id).await {
        Ok(gift) => (StatusCode::OK, Json(gift)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Move a gift to a new status
pub async fn update_gift_status(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
    Json(request): Json<UpdateGiftStatusRequest>,
) -> impl IntoResponse {
    info!("PUT /api/gifts/{} - status: {}", gift_id, request.status);

    match state
        .gift_service
        .update_gift_status(&gift_id, request.status)
        .await
    {
        Ok(gift) => (StatusCode::OK, Json(gift)).into_response(),
        Err(e) => {
            error!("Failed to update gift {}: {}", gift_id, e);
            ApiError::from(e).into_response()
        }
    }
}

/// Gift counts per workshop stage
pub async fn get_gift_progress(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/gifts/progress");

    match state.gift_service.gift_progress().await {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(e) => {
            error!("Failed to compute gift progress: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
