//! Domain methods for the Curio API client.

use crate::{api_prefix, ApiClient};
use anyhow::Result;
use async_trait::async_trait;
use curio_core::models::{
    GatewayListResponse, MigrationResult, MigrationStatus, RepairReport, RepairRequest,
    RunMigrationRequest, ValidationReport,
};
use curio_storage::{StorageError, StorageResult, SystemGatewaySource};

impl ApiClient {
    pub async fn migration_status(&self) -> Result<MigrationStatus> {
        self.get(&format!("{}/migration/status", api_prefix())).await
    }

    /// Omitted fields fall back to the server's configuration.
    pub async fn run_migration(
        &self,
        base_asset_url: Option<String>,
        batch_size: Option<u32>,
    ) -> Result<MigrationResult> {
        let body = RunMigrationRequest {
            base_asset_url,
            batch_size,
        };
        self.post_json(&format!("{}/migration/run", api_prefix()), &body)
            .await
    }

    pub async fn repair_file_ids(&self, base_asset_url: Option<String>) -> Result<RepairReport> {
        let body = RepairRequest { base_asset_url };
        self.post_json(&format!("{}/migration/repair", api_prefix()), &body)
            .await
    }

    pub async fn validate_migration(&self) -> Result<ValidationReport> {
        self.post_json(
            &format!("{}/migration/validate", api_prefix()),
            &serde_json::json!({}),
        )
        .await
    }

    pub async fn system_gateways(&self) -> Result<Vec<String>> {
        let response: GatewayListResponse =
            self.get(&format!("{}/config/gateways", api_prefix())).await?;
        Ok(response.gateways)
    }
}

#[async_trait]
impl SystemGatewaySource for ApiClient {
    async fn fetch_system_gateways(&self) -> StorageResult<Vec<String>> {
        self.system_gateways().await.map_err(|e| {
            tracing::debug!(error = %e, "Could not fetch system gateways");
            StorageError::LookupFailed(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_server_is_lookup_error() {
        // Port 9 (discard) is closed on test machines.
        let client = ApiClient::new("http://127.0.0.1:9".to_string(), None).unwrap();
        match client.fetch_system_gateways().await {
            Err(StorageError::LookupFailed(_)) => {}
            other => panic!("expected LookupFailed, got {:?}", other),
        }
    }
}
