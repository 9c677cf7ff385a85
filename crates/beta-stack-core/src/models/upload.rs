use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::pin::Pin;
use utoipa::ToSchema;

use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::error::{AppError, ErrorMetadata};

/// Request payload as a stream of chunks, in whatever sizes the transport delivers.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// One inbound upload, built per request.
pub struct UploadRequest {
    /// Declared MIME type; not validated against an allowlist.
    pub content_type: String,
    /// Client file name hint, untrusted.
    pub suggested_name: Option<String>,
    /// `None` when the request carried no body at all.
    pub body: Option<ByteStream>,
}

impl UploadRequest {
    pub fn new(
        content_type: Option<String>,
        suggested_name: Option<String>,
        body: Option<ByteStream>,
    ) -> Self {
        let content_type = content_type
            .map(|ct| ct.trim().to_string())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Self {
            content_type,
            suggested_name: suggested_name.filter(|name| !name.trim().is_empty()),
            body,
        }
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("content_type", &self.content_type)
            .field("suggested_name", &self.suggested_name)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Outcome of one upload, returned to the client as JSON.
///
/// Clients must look at `success`: failures are reported in this body, not through
/// the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success: bool,
    /// Final on-disk name, `<epoch-millis>-<name>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Bytes written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// ISO-8601 completion time (UTC, millisecond precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn success(file_name: impl Into<String>, size: u64, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            file_name: Some(file_name.into()),
            size: Some(size),
            uploaded_at: Some(uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            file_name: None,
            size: None,
            uploaded_at: None,
            error: Some(error.into()),
        }
    }
}

impl From<&AppError> for UploadResult {
    fn from(err: &AppError) -> Self {
        UploadResult::failure(err.client_message())
    }
}
