//! Beta Stack Core Library
//!
//! This crate provides the upload domain models, file naming rules, error types and
//! configuration shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ByteStream, UploadRequest, UploadResult};
