//! Storage source registry
//!
//! Sources are created lazily, looked up by display name. Replicas of one
//! logical pool share a display name.

use std::sync::Arc;

use curio_core::models::{NewStorageSource, StorageSource};
use curio_core::{AppError, SourceKind};
use curio_db::StorageSourceRepo;

#[derive(Clone)]
pub struct StorageSourceRegistry {
    sources: Arc<dyn StorageSourceRepo>,
}

impl StorageSourceRegistry {
    pub fn new(sources: Arc<dyn StorageSourceRepo>) -> Self {
        Self { sources }
    }

    /// Return the source named `name`, inserting it first if missing.
    ///
    /// Lookup is by name only. An existing source keeps its kind and template.
    #[tracing::instrument(skip(self, endpoint_template))]
    pub async fn get_or_create_by_name(
        &self,
        name: &str,
        kind: SourceKind,
        endpoint_template: Option<String>,
    ) -> Result<StorageSource, AppError> {
        if let Some(existing) = self.sources.find_by_name(name).await? {
            if existing.kind != kind {
                tracing::warn!(
                    source = name,
                    existing_kind = %existing.kind,
                    requested_kind = %kind,
                    "Storage source exists with a different kind"
                );
            } else if endpoint_template.is_some() && existing.endpoint_template != endpoint_template {
                tracing::warn!(
                    source = name,
                    existing = existing.endpoint_template.as_deref().unwrap_or(""),
                    "Storage source exists with a different endpoint template"
                );
            }
            return Ok(existing);
        }

        let created = self
            .sources
            .insert(NewStorageSource {
                kind,
                display_name: name.to_string(),
                endpoint_template,
            })
            .await?;
        tracing::info!(source = name, source_key = %created.external_key, "Created storage source");
        Ok(created)
    }

    /// All IPFS-capable (or otherwise `kind`) replicas sharing `name`.
    pub async fn list_by_name_and_kind(
        &self,
        name: &str,
        kind: SourceKind,
    ) -> Result<Vec<StorageSource>, AppError> {
        self.sources.list_by_name_and_kind(name, kind).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<StorageSource>, AppError> {
        self.sources.get(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<StorageSource>, AppError> {
        self.sources.find_by_name(name).await
    }
}
