use std::collections::HashMap;

use curio_core::models::{ExternalObject, RepairReport, StorageSource};
use curio_core::{AppError, SourceKind};
use curio_db::Repositories;
use curio_storage::gateway_base;

use super::classify::strip_base_prefix;

/// Recover a bare identifier from a value that starts with the base URL.
fn repaired_file_id(file_id: &str, base: &str) -> Option<String> {
    strip_base_prefix(file_id, base)
}

/// Direct sources whose template has nothing in front of the marker hand out
/// the stored identifier as the final URL, so a full URL there is intended.
fn stores_full_urls(source: &StorageSource) -> bool {
    source.kind == SourceKind::DirectUrl
        && source
            .endpoint_template
            .as_deref()
            .and_then(gateway_base)
            .is_none()
}

/// Fixes external objects whose identifier was stored as a full URL.
#[derive(Clone)]
pub struct RepairPass {
    repos: Repositories,
}

impl RepairPass {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Only a failed scan is an `Err`; per-object failures land in the report.
    #[tracing::instrument(skip(self))]
    pub async fn repair(&self, base_asset_url: &str) -> Result<RepairReport, AppError> {
        let base = base_asset_url.trim();
        if base.is_empty() {
            return Err(AppError::InvalidInput(
                "baseAssetUrl must not be empty".to_string(),
            ));
        }

        let candidates = self.repos.objects.find_file_id_containing(base).await?;
        let mut report = RepairReport {
            scanned_count: candidates.len() as i64,
            ..Default::default()
        };

        let mut sources: HashMap<i64, Option<StorageSource>> = HashMap::new();
        for object in &candidates {
            let source = match sources.get(&object.source_id) {
                Some(cached) => cached.clone(),
                None => match self.repos.sources.get(object.source_id).await {
                    Ok(found) => {
                        sources.insert(object.source_id, found.clone());
                        found
                    }
                    Err(e) => {
                        report.errors.push(format!(
                            "Failed to load source for external object {}: {}",
                            object.external_key, e
                        ));
                        continue;
                    }
                },
            };
            if source.as_ref().is_some_and(stores_full_urls) {
                tracing::debug!(object_key = %object.external_key, "Skipping verbatim URL source");
                continue;
            }

            match self.repair_one(object, base).await {
                Ok(true) => report.repaired_count += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(object_key = %object.external_key, error = %e, "Repair failed");
                    report
                        .errors
                        .push(format!("Failed to repair external object {}: {}", object.external_key, e));
                }
            }
        }

        tracing::info!(
            scanned = report.scanned_count,
            repaired = report.repaired_count,
            errors = report.errors.len(),
            "Repair pass finished"
        );
        Ok(report)
    }

    async fn repair_one(&self, object: &ExternalObject, base: &str) -> Result<bool, AppError> {
        let repaired = match repaired_file_id(&object.file_id, base) {
            Some(value) if value != object.file_id => value,
            _ => return Ok(false),
        };
        self.repos
            .objects
            .update_file_id(object.id, &repaired)
            .await?;
        tracing::debug!(object_key = %object.external_key, file_id = %repaired, "Repaired file id");
        Ok(true)
    }
}
