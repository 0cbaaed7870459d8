//! Migration admin endpoints: status, run, repair and validate.
//!
//! Runs are awaited inline; a structural failure still answers 200 with
//! `success: false` so the caller sees the partial status.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use curio_core::models::{
    MigrationResult, MigrationStatus, RepairReport, RepairRequest, RunMigrationRequest,
    ValidationReport,
};
use curio_core::AppError;
use std::sync::Arc;

fn missing_base_url() -> AppError {
    AppError::BadRequest(
        "baseAssetUrl is required when ASSET_BASE_URL is not configured".to_string(),
    )
}

#[utoipa::path(
    get,
    path = "/api/v0/migration/status",
    tag = "migration",
    responses(
        (status = 200, description = "Current migration progress", body = MigrationStatus),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn migration_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MigrationStatus>, HttpAppError> {
    Ok(Json(state.migration.status.status().await?))
}

#[utoipa::path(
    post,
    path = "/api/v0/migration/run",
    tag = "migration",
    request_body = RunMigrationRequest,
    responses(
        (status = 200, description = "Run finished, check `success`", body = MigrationResult),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "run_migration"))]
pub async fn run_migration(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RunMigrationRequest>,
) -> Result<Json<MigrationResult>, HttpAppError> {
    let base = state
        .migration
        .base_asset_url(request.base_asset_url)
        .ok_or_else(missing_base_url)?;
    let batch_size = request.batch_size.unwrap_or(state.migration.batch_size);

    let result = state.migration.engine.migrate(&base, batch_size).await?;
    if !result.success {
        tracing::warn!(message = %result.message, "Migration run aborted");
    }
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v0/migration/repair",
    tag = "migration",
    request_body = RepairRequest,
    responses(
        (status = 200, description = "Repair pass finished", body = RepairReport),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "repair_file_ids"))]
pub async fn repair_file_ids(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RepairRequest>,
) -> Result<Json<RepairReport>, HttpAppError> {
    let base = state
        .migration
        .base_asset_url(request.base_asset_url)
        .ok_or_else(missing_base_url)?;
    Ok(Json(state.migration.repair.repair(&base).await?))
}

#[utoipa::path(
    post,
    path = "/api/v0/migration/validate",
    tag = "migration",
    responses(
        (status = 200, description = "Integrity report", body = ValidationReport),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn validate_migration(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ValidationReport>, HttpAppError> {
    Ok(Json(state.migration.status.validate().await?))
}
