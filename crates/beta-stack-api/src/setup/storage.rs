//! Upload storage initialization

use anyhow::{Context, Result};
use beta_stack_core::Config;
use beta_stack_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Create the upload root (with missing parents) and wrap it as the storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.upload_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to initialize upload directory {}",
                config.upload_dir().display()
            )
        })?;

    tracing::info!(
        upload_dir = %storage.root().display(),
        timeout_secs = ?config.upload.upload_timeout_secs,
        remove_partial = config.remove_partial_uploads(),
        "Local upload storage ready"
    );

    Ok(Arc::new(storage))
}
