//! Route configuration and setup.

pub mod health;

use crate::api_doc::openapi_json;
use crate::error::not_found;
use crate::handlers::{info::service_info, stream_upload::stream_upload};
use crate::middleware::{cors_middleware, request_id_middleware, CorsConfig};
use crate::state::AppState;
use crate::telemetry::make_request_span;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    routing::{get, post},
    Router,
};
use beta_stack_core::Config;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = Arc::new(CorsConfig::new(config.cors_origin_prefixes().to_vec()));
    tracing::info!(
        origin_prefixes = %config.cors_origin_prefixes().join(","),
        "CORS origin prefixes configured"
    );

    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| make_request_span(request));

    let app = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/upload/stream", post(stream_upload))
        .route("/api/openapi.json", get(openapi_json))
        .fallback(not_found)
        // Bodies are streamed to disk; no size cap
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(trace_layer)
                .layer(axum::middleware::from_fn_with_state(cors, cors_middleware)),
        )
        .with_state(state);

    Ok(app)
}
