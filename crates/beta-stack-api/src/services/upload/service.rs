//! Streaming upload service
//!
//! Runs one upload end to end: name → store → report. Every failure, including a
//! missing body, becomes an `UploadResult` with `success: false`; nothing here
//! returns an HTTP error.

use std::sync::Arc;
use std::time::Duration;

use beta_stack_core::naming::derive_stored_name;
use beta_stack_core::{AppError, Config, UploadRequest, UploadResult};
use beta_stack_storage::{Storage, StreamOptions};
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::error::log_error;

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn Storage>,
    shutdown: CancellationToken,
    timeout: Option<Duration>,
    remove_partial: bool,
}

impl UploadService {
    pub fn new(storage: Arc<dyn Storage>, shutdown: CancellationToken, config: &Config) -> Self {
        Self {
            storage,
            shutdown,
            timeout: config.upload_timeout(),
            remove_partial: config.remove_partial_uploads(),
        }
    }

    /// Drain `request.body` into a new file under the upload root and describe the outcome.
    #[tracing::instrument(
        skip(self, request),
        fields(content_type = %request.content_type, suggested_name = ?request.suggested_name)
    )]
    pub async fn handle(&self, request: UploadRequest) -> UploadResult {
        match self.store(request).await {
            Ok(result) => result,
            Err(err) => {
                log_error(&err, "Upload failed");
                UploadResult::from(&err)
            }
        }
    }

    async fn store(&self, request: UploadRequest) -> Result<UploadResult, AppError> {
        let body = request.body.ok_or(AppError::MissingBody)?;

        let file_name = derive_stored_name(
            request.suggested_name.as_deref(),
            &request.content_type,
            Utc::now(),
        );

        let options = StreamOptions {
            cancel: self.shutdown.child_token(),
            deadline: self.timeout,
            remove_partial_on_failure: self.remove_partial,
        };

        let stored = self.storage.store_stream(&file_name, body, options).await?;

        tracing::info!(
            file_name = %stored.file_name,
            size_bytes = stored.size,
            "Upload stored"
        );

        Ok(UploadResult::success(stored.file_name, stored.size, Utc::now()))
    }
}
