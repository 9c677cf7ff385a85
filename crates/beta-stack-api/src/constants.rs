//! API-level constants

use std::time::Duration;

/// Header used to correlate a request across services and logs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Methods advertised to allowed cross-origin callers.
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers advertised to allowed cross-origin callers.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, X-File-Name";

/// Upper bound for a single readiness probe of the upload root.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str =
    "beta_stack_api=debug,beta_stack_storage=debug,beta_stack_core=debug,tower_http=debug";
