//! Test helpers: router over the in-memory store.
//!
//! Run with `cargo test -p curio-api`. No database is needed.

#![allow(dead_code)]

use axum_test::TestServer;
use curio_api::constants;
use curio_api::setup::{routes, services};
use curio_core::models::NewStorageSource;
use curio_core::{ArchiveConfig, BaseConfig, Config, SourceKind};
use curio_db::{MemoryStore, Repositories};

pub const BASE_URL: &str = "https://assets.example.com";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn test_config(asset_base_url: Option<&str>) -> Config {
    Config(Box::new(ArchiveConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            environment: "test".to_string(),
        },
        database_url: "postgres://unused".to_string(),
        asset_base_url: asset_base_url.map(str::to_string),
        migration_batch_size: 2,
        ipfs_gateways: vec![
            "https://ipfs.io/ipfs/".to_string(),
            "https://dweb.link/ipfs/".to_string(),
        ],
    }))
}

pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Seed a source the way the migration engine would create it.
    pub fn add_source(&self, kind: SourceKind, name: &str, template: Option<&str>) -> i64 {
        self.store
            .add_source(NewStorageSource {
                kind,
                display_name: name.to_string(),
                endpoint_template: template.map(str::to_string),
            })
            .id
    }
}

pub fn setup_test_app_with(asset_base_url: Option<&str>) -> TestApp {
    let store = MemoryStore::new();
    let config = test_config(asset_base_url);
    let state = services::build_state(&config, Repositories::in_memory(store.clone()));
    let router = routes::setup_routes(&config, state).expect("router");
    let server = TestServer::new(router).expect("test server");
    TestApp { server, store }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(Some(BASE_URL))
}
