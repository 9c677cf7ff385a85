//! Beta Stack API Library
//!
//! HTTP handlers, middleware and application setup for the streaming upload service.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod services;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::info::ServiceInfo;
pub use services::upload::UploadService;
pub use setup::routes::health::HealthResponse;
