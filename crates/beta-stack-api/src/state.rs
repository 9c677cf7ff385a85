//! Application state shared by every handler.

use crate::services::upload::UploadService;
use beta_stack_core::Config;
use beta_stack_storage::Storage;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub uploads: UploadService,
}

impl AppState {
    /// `shutdown` is cancelled once the server starts shutting down; every upload runs
    /// under a child of it.
    pub fn new(config: Config, storage: Arc<dyn Storage>, shutdown: CancellationToken) -> Self {
        let uploads = UploadService::new(storage.clone(), shutdown, &config);

        Self {
            config,
            storage,
            uploads,
        }
    }
}
