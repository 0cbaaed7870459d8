mod helpers;

use axum::http::StatusCode;
use curio_core::models::ContentKind;
use curio_core::{ExternalKey, SourceKind};
use helpers::{setup_test_app, setup_test_app_with};

#[tokio::test]
async fn test_linked_asset_redirects_to_template_url() {
    let app = setup_test_app();
    let source = app.add_source(
        SourceKind::DirectUrl,
        "Default Asset Storage",
        Some("https://assets.example.com/{FILE_ID}"),
    );
    let asset = app.store.add_asset(Some("covers/a.png"));
    let object = app.store.add_object(source, "covers/a.png");
    app.store.add_link(ContentKind::Asset, asset.id, object.id);

    let response = app
        .client()
        .get(&format!("/file/{}", asset.external_key))
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://assets.example.com/covers/a.png"
    );
}

#[tokio::test]
async fn test_ipfs_media_redirects_to_first_gateway() {
    let app = setup_test_app();
    let source = app.add_source(SourceKind::Ipfs, "Pinned", None);
    let media = app.store.add_media(None, Some("audio/mpeg"));
    let object = app.store.add_object(source, "bafysong");
    app.store.add_link(ContentKind::Media, media.id, object.id);

    let response = app
        .client()
        .get(&format!("/file/{}", media.external_key))
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://ipfs.io/ipfs/bafysong");
}

#[tokio::test]
async fn test_unmigrated_media_falls_back_to_legacy_url() {
    let app = setup_test_app();
    let media = app.store.add_media(Some("songs/1.mp3"), None);

    let response = app
        .client()
        .get(&format!("/file/{}", media.external_key))
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://assets.example.com/songs/1.mp3"
    );
}

#[tokio::test]
async fn test_unknown_key_is_structured_404() {
    let app = setup_test_app();
    let key = ExternalKey::new();

    let response = app
        .client()
        .get(&format!("/file/{}", key))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["key"], key.to_string());
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_relative_reference_without_base_is_404() {
    let app = setup_test_app_with(None);
    let asset = app.store.add_asset(Some("a.png"));

    app.client()
        .get(&format!("/file/{}", asset.external_key))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_key_is_bad_request() {
    let app = setup_test_app();

    let response = app.client().get("/file/not-a-key").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}
