//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use curio_core::Config;
use curio_db::Repositories;
use std::sync::Arc;

/// Validate config, connect, migrate, wire services and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let state = services::build_state(&config, Repositories::postgres(pool));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
