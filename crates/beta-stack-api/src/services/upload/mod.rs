//! Streaming upload service.

mod service;

pub use service::UploadService;
