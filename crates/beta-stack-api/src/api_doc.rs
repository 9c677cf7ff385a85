//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::setup::routes::health;
use beta_stack_core::UploadResult;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Beta Stack API",
        description = "Streaming file upload service. Request bodies are written to disk as they arrive."
    ),
    paths(
        handlers::info::service_info,
        handlers::stream_upload::stream_upload,
        health::liveness_check,
        health::readiness_check,
    ),
    components(schemas(
        UploadResult,
        ErrorResponse,
        handlers::info::ServiceInfo,
        health::HealthResponse,
    )),
    tags(
        (name = "uploads", description = "File uploads"),
        (name = "health", description = "Liveness and readiness probes"),
        (name = "service", description = "Service metadata")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
