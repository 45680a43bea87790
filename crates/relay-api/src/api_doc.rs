//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use relay_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blob Relay API",
        version = "0.1.0",
        description = "Replicates objects named by storage notifications into a fixed destination account."
    ),
    paths(
        handlers::events::handle_blob_event,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::CopyOutcome,
        models::CopyStatus,
        models::DestinationRef,
        error::ErrorResponse,
        handlers::health::ReadinessResponse,
    )),
    tags(
        (name = "events", description = "Storage notification webhook"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
