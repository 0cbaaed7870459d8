//! Route configuration and setup.

mod health;

use crate::constants::{API_PREFIX, MAX_REQUEST_BODY_BYTES, OPENAPI_JSON_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use curio_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

const HTTP_CONCURRENCY_LIMIT: usize = 1_024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = public_routes()
        .merge(migration_routes())
        .merge(
            utoipa_rapidoc::RapiDoc::with_openapi(OPENAPI_JSON_PATH, crate::get_openapi_spec())
                .path("/docs"),
        )
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/file/{key}", get(handlers::file_redirect::redirect_file))
        .route(
            &format!("{}/config/gateways", API_PREFIX),
            get(handlers::gateways::list_system_gateways),
        )
}

fn migration_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/migration/status", API_PREFIX),
            get(handlers::migration::migration_status),
        )
        .route(
            &format!("{}/migration/run", API_PREFIX),
            post(handlers::migration::run_migration),
        )
        .route(
            &format!("{}/migration/repair", API_PREFIX),
            post(handlers::migration::repair_file_ids),
        )
        .route(
            &format!("{}/migration/validate", API_PREFIX),
            post(handlers::migration::validate_migration),
        )
}
