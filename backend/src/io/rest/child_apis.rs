//! # REST API for Children
//!
//! Endpoints for registering children, listing and searching them.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::{error, info};

use super::error::ApiError;
use crate::AppState;
use shared::CreateChildRequest;

#[derive(Debug, Deserialize)]
pub struct ChildSearchParams {
    pub query: Option<String>,
}

/// Create a new child (and its gifts, for nice children)
pub async fn create_child(
    State(state): State<AppState>,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    match state.child_service.create_child(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create child: {}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// Get a child by ID
pub async fn get_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}", child_id);

    match state.child_service.get_child(&child_id).await {
        Ok(child) => (StatusCode::OK, Json(child)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// List all children, or those matching `?query=`
pub async fn list_children(
    State(state): State<AppState>,
    Query(params): Query<ChildSearchParams>,
) -> impl IntoResponse {
    let result = match params.query.as_deref() {
        Some(query) => {
            info!("GET /api/children?query={}", query);
            state.child_service.search_children(query).await
        }
        None => {
            info!("GET /api/children");
            state.child_service.list_children().await
        }
    };

    match result {
        Ok(children) => (StatusCode::OK, Json(children)).into_response(),
        Err(e) => {
            error!("Failed to list children: {}", e);
            ApiError::from(e).into_response()
        }
    }
}
