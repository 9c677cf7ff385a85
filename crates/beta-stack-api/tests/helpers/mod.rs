use axum_test::TestServer;
use beta_stack_api::setup::build_app;
use beta_stack_api::state::AppState;
use beta_stack_core::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Test application backed by a scratch upload directory
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub shutdown: CancellationToken,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.state.config.upload_dir().to_path_buf()
    }

    /// Names of the files currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir())
            .expect("upload dir should exist")
            .map(|entry| {
                entry
                    .expect("readable dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Setup a test application with default configuration
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test application, adjusting the configuration first
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    // Nested so the test also covers creating missing parents
    config.upload.upload_dir = temp_dir.path().join("data").join("uploads");
    customize(&mut config);

    let shutdown = CancellationToken::new();
    let (state, app) = build_app(config, shutdown.clone())
        .await
        .expect("Failed to build app");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        shutdown,
        _temp_dir: temp_dir,
    }
}
