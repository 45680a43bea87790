//! Route configuration and setup

use crate::constants::{API_BASE, API_PREFIX, BLOB_EVENTS_PATH, LEGACY_TRIGGER_PATH};
use crate::handlers::events::handle_blob_event;
use crate::handlers::health::{liveness_check, readiness_check};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use relay_core::Config;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let body_limit = config.max_event_body_bytes;
    if body_limit == 0 {
        return Err(anyhow::anyhow!("MAX_EVENT_BODY_BYTES must be greater than 0"));
    }

    let app = Router::new()
        .merge(health_routes())
        .merge(event_routes(body_limit))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(
        events_path = %format!("{}{}", API_PREFIX, BLOB_EVENTS_PATH),
        body_limit,
        "Routes configured"
    );

    Ok(app)
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}

/// Webhook routes, both mounted on the same handler and capped at `body_limit` bytes.
fn event_routes(body_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}{}", API_PREFIX, BLOB_EVENTS_PATH),
            post(handle_blob_event),
        )
        .route(
            &format!("{}{}", API_BASE, LEGACY_TRIGGER_PATH),
            post(handle_blob_event),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
}
