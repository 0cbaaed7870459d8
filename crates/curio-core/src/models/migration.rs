use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::key::ExternalKey;

/// Progress of the legacy reference migration, always recomputed from link counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStatus {
    pub in_progress: bool,
    pub completed: bool,
    pub total_assets: i64,
    pub total_media_sources: i64,
    pub migrated_assets: i64,
    pub migrated_media_sources: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_source_external_key: Option<ExternalKey>,
    pub errors: Vec<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    pub fn is_fully_linked(&self) -> bool {
        self.migrated_assets == self.total_assets
            && self.migrated_media_sources == self.total_media_sources
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationState {
    NotStarted,
    InProgress,
    Completed,
    CompletedWithErrors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub success: bool,
    pub state: MigrationState,
    pub status: MigrationStatus,
    pub message: String,
    /// Assets linked during this invocation only.
    pub newly_migrated_assets: i64,
    /// Media sources linked during this invocation only.
    pub newly_migrated_media_sources: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub repaired_count: i64,
    pub scanned_count: i64,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub status: MigrationStatus,
}

/// Request DTO for starting a migration run
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunMigrationRequest {
    #[serde(default)]
    #[validate(url(message = "baseAssetUrl must be an absolute URL"))]
    pub base_asset_url: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 1000, message = "batchSize must be between 1 and 1000"))]
    pub batch_size: Option<u32>,
}

/// Request DTO for the identifier repair pass
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    #[serde(default)]
    #[validate(url(message = "baseAssetUrl must be an absolute URL"))]
    pub base_asset_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GatewayListResponse {
    pub gateways: Vec<String>,
}
