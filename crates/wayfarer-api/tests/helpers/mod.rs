//! Test helpers: build the router over an in-memory document store and a temp media root.
//!
//! Run from workspace root: `cargo test -p wayfarer-api`.

pub mod fixtures;

use axum_test::TestServer;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use wayfarer_api::constants;
use wayfarer_api::setup::build_app;
use wayfarer_core::Config;
use wayfarer_db::MemoryDocumentStore;

/// API path prefix for tests (e.g. `/api/v1/addresses`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
    pub media_root: PathBuf,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// On-disk folder of `segment` under the media root directory `root_dir`.
    pub fn folder(&self, root_dir: &str, segment: &str) -> PathBuf {
        self.media_root.join(root_dir).join(segment)
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup with a config tweak applied on top of the test defaults.
pub async fn setup_test_app_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let media_root = temp_dir.path().join("media");

    let mut config = Config {
        media_root: media_root.clone(),
        upload_temp_dir: temp_dir.path().join("incoming"),
        trending_states: vec!["Rajasthan".to_string(), "Andaman".to_string()],
        ..Config::default()
    };
    tweak(&mut config);

    let (_state, router) = build_app(config, Arc::new(MemoryDocumentStore::new()))
        .await
        .expect("Failed to build app");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
        media_root,
    }
}
