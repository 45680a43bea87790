//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p relay-api`.
//! Storage is the local backend in a temp directory; secrets are in memory.

#![allow(dead_code)]

use axum_test::TestServer;
use relay_api::constants;
use relay_api::setup::{build_state, routes};
use relay_core::{AccountRole, Config, FailurePolicy};
use relay_services::{SecretStore, StaticSecretStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const SOURCE_ACCOUNT: &str = "acct1";
pub const DESTINATION_ACCOUNT: &str = "backup";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Notification body naming `container/key` in the source account.
pub fn blob_event(container: &str, key: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "831e1650-001e-001b-66ab-eeb76e069631",
        "eventType": "Microsoft.Storage.BlobCreated",
        "subject": format!("/blobServices/default/containers/{}/blobs/{}", container, key),
        "data": {
            "url": format!("https://{}.example-storage.net/{}/{}", SOURCE_ACCOUNT, container, key)
        }
    })
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn root(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Path of an object in the local backend.
    pub fn object_path(&self, account: &str, container: &str, key: &str) -> PathBuf {
        self.root().join(account).join(container).join(key)
    }

    /// Place an object directly into the source account.
    pub fn seed_source(&self, container: &str, key: &str, data: &[u8]) {
        let path = self.object_path(SOURCE_ACCOUNT, container, key);
        std::fs::create_dir_all(path.parent().expect("object path has a parent"))
            .expect("Failed to create source container");
        std::fs::write(path, data).expect("Failed to seed source object");
    }
}

pub fn default_secrets() -> StaticSecretStore {
    StaticSecretStore::new()
        .with_secret(SOURCE_ACCOUNT, AccountRole::Source, "source-secret")
        .with_secret(DESTINATION_ACCOUNT, AccountRole::Destination, "dest-secret")
}

pub fn create_test_config(root: &Path, policy: FailurePolicy) -> Config {
    let root = root.to_string_lossy().into_owned();
    let policy = policy.to_string();
    Config::from_lookup(|key| match key {
        "DESTINATION_ACCOUNT" => Some(DESTINATION_ACCOUNT.to_string()),
        "STORAGE_BACKEND" => Some("local".to_string()),
        "LOCAL_STORAGE_PATH" => Some(root.clone()),
        "RELAY_FAILURE_POLICY" => Some(policy.clone()),
        "MAX_EVENT_BODY_BYTES" => Some("4096".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Setup test app with local storage and the default credentials.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(FailurePolicy::Lenient, default_secrets())
}

pub fn setup_test_app_with(policy: FailurePolicy, secrets: StaticSecretStore) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(temp_dir.path(), policy);

    let secrets: Arc<dyn SecretStore> = Arc::new(secrets);
    let state = build_state(config.clone(), secrets);

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}
