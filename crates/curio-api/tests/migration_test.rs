mod helpers;

use axum::http::StatusCode;
use curio_core::models::{MigrationResult, MigrationState, MigrationStatus, RepairReport};
use curio_core::SourceKind;
use helpers::{api_path, setup_test_app, setup_test_app_with, BASE_URL};
use serde_json::json;

#[tokio::test]
async fn test_health_and_gateways() {
    let app = setup_test_app();

    let health: serde_json::Value = app.client().get("/health").await.json();
    assert_eq!(health["status"], "alive");

    let gateways: serde_json::Value = app.client().get(&api_path("/config/gateways")).await.json();
    assert_eq!(
        gateways["gateways"],
        json!(["https://ipfs.io/ipfs/", "https://dweb.link/ipfs/"])
    );
}

#[tokio::test]
async fn test_run_migration_links_everything_and_is_idempotent() {
    let app = setup_test_app();
    app.store.add_asset(Some("a.png"));
    app.store.add_asset(Some("b.png"));
    app.store.add_media(Some("https://assets.example.com/foo/bar.png"), None);
    app.store.add_media(Some("https://cdn.other.com/x.png"), Some("image/png"));
    app.store.add_media(Some("songs/1.mp3"), None);

    let first: MigrationResult = app
        .client()
        .post(&api_path("/migration/run"))
        .json(&json!({}))
        .await
        .json();
    assert!(first.success, "{}", first.message);
    assert_eq!(first.state, MigrationState::Completed);
    assert_eq!(first.newly_migrated_assets, 2);
    assert_eq!(first.newly_migrated_media_sources, 3);
    assert!(first.status.completed);

    let second: MigrationResult = app
        .client()
        .post(&api_path("/migration/run"))
        .json(&json!({ "baseAssetUrl": BASE_URL, "batchSize": 1 }))
        .await
        .json();
    assert_eq!(second.newly_migrated_assets, 0);
    assert_eq!(second.newly_migrated_media_sources, 0);

    let status: MigrationStatus = app.client().get(&api_path("/migration/status")).await.json();
    assert_eq!(status.migrated_assets, 2);
    assert_eq!(status.migrated_media_sources, 3);
    assert!(status.default_source_external_key.is_some());

    let report: serde_json::Value = app
        .client()
        .post(&api_path("/migration/validate"))
        .await
        .json();
    assert_eq!(report["valid"], true);
}

#[tokio::test]
async fn test_run_without_any_base_url_is_bad_request() {
    let app = setup_test_app_with(None);

    app.client()
        .post(&api_path("/migration/run"))
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_run_rejects_out_of_range_batch_size() {
    let app = setup_test_app();

    let response = app
        .client()
        .post(&api_path("/migration/run"))
        .json(&json!({ "batchSize": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repair_endpoint_strips_base_url() {
    let app = setup_test_app();
    let source = app.add_source(
        SourceKind::DirectUrl,
        "Default Asset Storage",
        Some("https://assets.example.com/{FILE_ID}"),
    );
    app.store.add_object(source, "https://assets.example.com/a.png");
    app.store.add_object(source, "a.png");

    let report: RepairReport = app
        .client()
        .post(&api_path("/migration/repair"))
        .json(&json!({}))
        .await
        .json();
    assert_eq!(report.repaired_count, 1);
    assert!(report.errors.is_empty());
    assert!(app.store.objects().iter().all(|o| o.file_id == "a.png"));
}

#[tokio::test]
async fn test_validate_flags_unmigrated_rows() {
    let app = setup_test_app();
    app.store.add_asset(Some("a.png"));

    let report: serde_json::Value = app
        .client()
        .post(&api_path("/migration/validate"))
        .await
        .json();
    assert_eq!(report["valid"], false);
    assert!(!report["status"]["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app();

    let doc: serde_json::Value = app.client().get("/api-docs/openapi.json").await.json();
    assert!(doc["paths"]["/api/v0/migration/run"].is_object());
    assert!(doc["paths"]["/file/{key}"].is_object());
}
