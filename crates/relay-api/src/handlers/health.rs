//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub storage_backend: String,
    pub destination_account: String,
    pub failure_policy: String,
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - reports the configuration events are handled with.
///
/// No storage call is made; credentials are only resolved per event.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses((status = 200, description = "Ready to accept events", body = ReadinessResponse))
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready".to_string(),
            storage_backend: config.storage_backend.to_string(),
            destination_account: config.destination_account.clone(),
            failure_policy: config.failure_policy.to_string(),
        }),
    )
}
