//! Shared constants

/// Service name reported by the API root endpoint.
pub const SERVICE_NAME: &str = "beta-stack-api";

/// Content type assumed when the client does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Header carrying the client-suggested file name.
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Prefix for names synthesized when the client sends no usable file name.
pub const SYNTHESIZED_NAME_PREFIX: &str = "upload";

/// Maximum length in bytes of a sanitized client file name (before the timestamp prefix).
pub const MAX_FILE_NAME_BYTES: usize = 200;
