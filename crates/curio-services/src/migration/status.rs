use curio_core::constants::DEFAULT_SOURCE_NAME;
use curio_core::models::{ContentKind, MigrationStatus, ValidationReport};
use curio_core::AppError;
use curio_db::Repositories;

/// Migration progress and integrity, recomputed on every call.
#[derive(Clone)]
pub struct MigrationStatusService {
    repos: Repositories,
}

impl MigrationStatusService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    #[tracing::instrument(skip(self))]
    pub async fn status(&self) -> Result<MigrationStatus, AppError> {
        let total_assets = self.repos.legacy.count(ContentKind::Asset).await?;
        let total_media_sources = self.repos.legacy.count(ContentKind::Media).await?;
        let migrated_assets = self.repos.links.count_linked(ContentKind::Asset).await?;
        let migrated_media_sources = self.repos.links.count_linked(ContentKind::Media).await?;
        let default_source = self.repos.sources.find_by_name(DEFAULT_SOURCE_NAME).await?;

        let mut status = MigrationStatus {
            in_progress: false,
            completed: false,
            total_assets,
            total_media_sources,
            migrated_assets,
            migrated_media_sources,
            default_source_external_key: default_source.map(|s| s.external_key),
            errors: Vec::new(),
            start_time: None,
            end_time: None,
        };
        status.completed = status.is_fully_linked() && status.default_source_external_key.is_some();
        Ok(status)
    }

    /// Status plus referential integrity checks, all folded into `errors`.
    #[tracing::instrument(skip(self))]
    pub async fn validate(&self) -> Result<ValidationReport, AppError> {
        let mut status = self.status().await?;

        if status.default_source_external_key.is_none() {
            status
                .errors
                .push(format!("Storage source '{}' does not exist", DEFAULT_SOURCE_NAME));
        }
        if status.migrated_assets < status.total_assets {
            status.errors.push(format!(
                "{} of {} assets are not migrated",
                status.total_assets - status.migrated_assets,
                status.total_assets
            ));
        }
        if status.migrated_media_sources < status.total_media_sources {
            status.errors.push(format!(
                "{} of {} media sources are not migrated",
                status.total_media_sources - status.migrated_media_sources,
                status.total_media_sources
            ));
        }

        let dangling = self.repos.links.count_dangling().await?;
        if dangling > 0 {
            status
                .errors
                .push(format!("{} links point to missing external objects", dangling));
        }
        let missing_source = self.repos.objects.count_missing_source().await?;
        if missing_source > 0 {
            status.errors.push(format!(
                "{} external objects reference a missing storage source",
                missing_source
            ));
        }
        let orphaned = self.repos.objects.count_orphaned().await?;
        if orphaned > 0 {
            status.errors.push(format!(
                "{} external objects are not linked to any asset or media source",
                orphaned
            ));
        }

        let valid = status.errors.is_empty();
        if !valid {
            tracing::warn!(issues = status.errors.len(), "Migration validation found problems");
        }
        Ok(ValidationReport { valid, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_core::models::NewStorageSource;
    use curio_core::SourceKind;
    use curio_db::MemoryStore;

    fn default_source(store: &MemoryStore) -> i64 {
        store
            .add_source(NewStorageSource {
                kind: SourceKind::DirectUrl,
                display_name: DEFAULT_SOURCE_NAME.to_string(),
                endpoint_template: Some("https://assets.example.com/{FILE_ID}".to_string()),
            })
            .id
    }

    #[tokio::test]
    async fn test_empty_archive_needs_default_source() {
        let store = MemoryStore::new();
        let service = MigrationStatusService::new(Repositories::in_memory(store.clone()));

        let status = service.status().await.unwrap();
        assert!(!status.completed);
        assert_eq!(status.total_assets, 0);

        default_source(&store);
        assert!(service.status().await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_validate_reports_integrity_problems() {
        let store = MemoryStore::new();
        let source_id = default_source(&store);
        let asset = store.add_asset(Some("a.png"));
        let object = store.add_object(source_id, "a.png");
        store.add_link(ContentKind::Asset, asset.id, object.id);
        let service = MigrationStatusService::new(Repositories::in_memory(store.clone()));

        let clean = service.validate().await.unwrap();
        assert!(clean.valid, "{:?}", clean.status.errors);
        assert!(clean.status.completed);

        store.add_object(4242, "lost.png");
        let media = store.add_media(Some("songs/1.mp3"), None);
        store.add_link(ContentKind::Media, media.id, 9999);

        let report = service.validate().await.unwrap();
        assert!(!report.valid);
        let joined = report.status.errors.join("\n");
        assert!(joined.contains("missing external objects"));
        assert!(joined.contains("missing storage source"));
        assert!(joined.contains("not linked"));
    }
}
