//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use beta_stack_core::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Initialize the entire application: config checks, tracing, storage, routes.
pub async fn initialize_app(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format(), config.environment());

    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    build_app(config, shutdown).await
}

/// Build state and router without touching global tracing state.
pub async fn build_app(
    config: Config,
    shutdown: CancellationToken,
) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), storage, shutdown));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
