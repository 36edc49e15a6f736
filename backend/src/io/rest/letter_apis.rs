//! # REST API for Letters
//!
//! Letters to Santa and generated replies.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use super::error::ApiError;
use crate::AppState;
use shared::{CreateLetterRequest, ReplyRequest};

pub async fn list_letters(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/letters");

    match state.letter_service.list_letters().await {
        Ok(letters) => (StatusCode::OK, Json(letters)).into_response(),
        Err(e) => {
            error!("Failed to list letters: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

pub async fn get_letter(
    State(state): State<AppState>,
    Path(letter_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/letters/{}", letter_id);

    match state.letter_service.get_letter(&letter_id).await {
        Ok(letter) => (StatusCode::OK, Json(letter)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_letter(
    State(state): State<AppState>,
    Json(request): Json<CreateLetterRequest>,
) -> impl IntoResponse {
    info!("POST /api/letters - from: {}", request.child_name);

    match state.letter_service.create_letter(request).await {
        Ok(letter) => (StatusCode::CREATED, Json(letter)).into_response(),
        Err(e) => {
            error!("Failed to create letter: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Generate Santa's reply, storing it when a `letterId` is given
pub async fn generate_reply(
    State(state): State<AppState>,
    Json(request): Json<ReplyRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/letters/reply - child: {}, letter: {:?}",
        request.child_name, request.letter_id
    );

    match state.letter_service.generate_reply(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to reply to letter: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
