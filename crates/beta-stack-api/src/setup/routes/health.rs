//! Health check handlers and response types.

use crate::constants::READINESS_TIMEOUT;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use beta_stack_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive", body = HealthResponse))
)]
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        storage: None,
    })
}

/// Readiness probe - the upload root is present and writable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready to accept uploads", body = HealthResponse),
        (status = 503, description = "Upload root unusable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, HttpAppError> {
    match tokio::time::timeout(READINESS_TIMEOUT, state.storage.health_check()).await {
        Ok(Ok(())) => Ok(Json(HealthResponse {
            status: "ready".to_string(),
            storage: Some("healthy".to_string()),
        })),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            Err(AppError::ServiceUnavailable(format!("storage: {}", e)).into())
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            Err(AppError::ServiceUnavailable("storage health check timed out".to_string()).into())
        }
    }
}
