//! Storage abstraction trait
//!
//! This module defines the Storage trait that upload backends implement.

use async_trait::async_trait;
use beta_stack_core::{AppError, ByteStream};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Reading the inbound stream failed (client reset, malformed body, ...)
    #[error("Upload stream failed: {0}")]
    StreamFailed(String),

    /// Writing to the destination failed (disk full, permission denied, ...)
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Upload cancelled: {0}")]
    Cancelled(String),

    #[error("Upload timed out after {0:?}")]
    TimedOut(Duration),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg)
            | StorageError::StreamFailed(msg)
            | StorageError::WriteFailed(msg) => AppError::Storage(msg),
            StorageError::Cancelled(msg) => AppError::Cancelled(msg),
            StorageError::TimedOut(after) => AppError::Timeout(after),
            StorageError::NotFound(key) => AppError::NotFound(key),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(e) => AppError::Storage(e.to_string()),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// Per-upload copy controls.
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    /// Cancelling this token aborts the copy at the next chunk or write boundary.
    pub cancel: CancellationToken,
    /// Overall deadline for draining the stream.
    pub deadline: Option<Duration>,
    /// Delete whatever was written when the copy fails.
    pub remove_partial_on_failure: bool,
}

/// A file persisted by [`Storage::store_stream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub size: u64,
    pub path: PathBuf,
}

/// Storage abstraction trait
///
/// The upload service only talks to this trait, so a different backend can be
/// dropped in without touching request handling.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Drain `stream` into a new file called `file_name` under the storage root.
    ///
    /// Chunks are written as they arrive; the payload is never held in memory as a
    /// whole. Existing files are never overwritten. On failure the file handle is
    /// released before returning; the partial file stays on disk unless
    /// `options.remove_partial_on_failure` is set.
    async fn store_stream(
        &self,
        file_name: &str,
        stream: ByteStream,
        options: StreamOptions,
    ) -> StorageResult<StoredFile>;

    /// Check if a file exists
    async fn exists(&self, file_name: &str) -> StorageResult<bool>;

    /// Get the size in bytes of a stored file.
    async fn content_length(&self, file_name: &str) -> StorageResult<u64>;

    /// Verify the storage root is usable.
    async fn health_check(&self) -> StorageResult<()>;

    /// Directory holding the stored files.
    fn root(&self) -> &Path;
}
