//! Tracing setup and HTTP span construction.

mod init;

pub use init::{init_telemetry, make_request_span};
