use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use bytes::Bytes;
use relay_core::CopyOutcome;
use std::sync::Arc;
use uuid::Uuid;

/// Handle a blob notification: replicate the named object to the destination account.
#[utoipa::path(
    post,
    path = "/api/v0/events/blob",
    tag = "events",
    request_body(
        content = String,
        content_type = "application/json",
        description = "Storage notification with a data.url field"
    ),
    responses(
        (status = 200, description = "Event handled; check status for partial failures", body = CopyOutcome),
        (status = 400, description = "Malformed event", body = ErrorResponse),
        (status = 413, description = "Event body too large"),
        (status = 500, description = "Missing credential or invalid client configuration", body = ErrorResponse),
        (status = 502, description = "Storage failure (strict failure policy)", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        request_id = %Uuid::new_v4(),
        event_id = tracing::field::Empty,
        body_bytes = body.len(),
        operation = "handle_blob_event"
    )
)]
pub async fn handle_blob_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CopyOutcome>, HttpAppError> {
    let outcome = state.orchestrator.handle_event(&body).await?;

    tracing::info!(
        status = ?outcome.status,
        destination = %outcome.destination.url,
        "Blob event handled"
    );

    Ok(Json(outcome))
}
