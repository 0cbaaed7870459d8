use chrono::{DateTime, Utc};
use curio_core::constants::{
    DEFAULT_MIME_TYPE, DEFAULT_SOURCE_NAME, DIRECT_URL_SOURCE_NAME, FILE_ID_PLACEHOLDER,
};
use curio_core::models::{
    ContentKind, LegacyAsset, LegacyMedia, MigrationResult, MigrationState, MigrationStatus,
    NewExternalObject, StorageSource,
};
use curio_core::{AppError, SourceKind};
use curio_db::Repositories;

use super::classify::{classify_media_url, MediaPlacement};
use super::status::MigrationStatusService;
use crate::registry::StorageSourceRegistry;

/// The two well-known sources every run writes into.
struct RunSources {
    default: StorageSource,
    direct: StorageSource,
}

/// Mutable bookkeeping for a single invocation.
struct RunLog {
    started: DateTime<Utc>,
    errors: Vec<String>,
    new_assets: i64,
    new_media: i64,
    default_source: Option<StorageSource>,
}

impl RunLog {
    fn row_failed(&mut self, kind: ContentKind, key: impl std::fmt::Display, error: AppError) {
        tracing::warn!(content.kind = %kind, content.key = %key, error = %error, "Row migration failed");
        self.errors.push(format!("Failed to migrate {} {}: {}", kind, key, error));
    }
}

/// Batch migration of legacy inline references into external objects.
#[derive(Clone)]
pub struct MigrationEngine {
    repos: Repositories,
    registry: StorageSourceRegistry,
    status: MigrationStatusService,
}

impl MigrationEngine {
    pub fn new(repos: Repositories) -> Self {
        Self {
            registry: StorageSourceRegistry::new(repos.sources.clone()),
            status: MigrationStatusService::new(repos.clone()),
            repos,
        }
    }

    /// Run (or resume) the migration.
    ///
    /// Only bad arguments produce `Err`. Row failures are collected in the
    /// result, and a structural failure ends the run with `success = false`.
    #[tracing::instrument(skip(self), fields(migration.batch_size = batch_size))]
    pub async fn migrate(
        &self,
        base_asset_url: &str,
        batch_size: u32,
    ) -> Result<MigrationResult, AppError> {
        let base = base_asset_url.trim();
        if base.is_empty() {
            return Err(AppError::InvalidInput(
                "baseAssetUrl must not be empty".to_string(),
            ));
        }
        if batch_size == 0 {
            return Err(AppError::InvalidInput(
                "batchSize must be at least 1".to_string(),
            ));
        }

        let mut log = RunLog {
            started: Utc::now(),
            errors: Vec::new(),
            new_assets: 0,
            new_media: 0,
            default_source: None,
        };
        tracing::info!(base_asset_url = base, "Starting legacy reference migration");

        let sources = match self.ensure_sources(base).await {
            Ok(sources) => sources,
            Err(e) => {
                return Ok(self
                    .finish(log, Some(format!("Failed to prepare storage sources: {}", e)))
                    .await)
            }
        };
        log.default_source = Some(sources.default.clone());

        if let Err(e) = self.migrate_assets(&sources, i64::from(batch_size), &mut log).await {
            return Ok(self
                .finish(log, Some(format!("Failed to read asset batch: {}", e)))
                .await);
        }
        if let Err(e) = self
            .migrate_media(&sources, base, i64::from(batch_size), &mut log)
            .await
        {
            return Ok(self
                .finish(log, Some(format!("Failed to read media batch: {}", e)))
                .await);
        }

        Ok(self.finish(log, None).await)
    }

    async fn ensure_sources(&self, base: &str) -> Result<RunSources, AppError> {
        let default_template = format!("{}/{}", base.trim_end_matches('/'), FILE_ID_PLACEHOLDER);
        let default = self
            .registry
            .get_or_create_by_name(DEFAULT_SOURCE_NAME, SourceKind::DirectUrl, Some(default_template))
            .await?;
        let direct = self
            .registry
            .get_or_create_by_name(
                DIRECT_URL_SOURCE_NAME,
                SourceKind::DirectUrl,
                Some(FILE_ID_PLACEHOLDER.to_string()),
            )
            .await?;
        Ok(RunSources { default, direct })
    }

    /// Returns `Err` only when a batch cannot be read.
    async fn migrate_assets(
        &self,
        sources: &RunSources,
        limit: i64,
        log: &mut RunLog,
    ) -> Result<(), AppError> {
        let mut offset = 0i64;
        loop {
            let batch = self.repos.legacy.list_assets(offset, limit).await?;
            if batch.is_empty() {
                break;
            }

            let before = log.new_assets;
            for asset in &batch {
                match self.migrate_asset(asset, &sources.default).await {
                    Ok(true) => log.new_assets += 1,
                    Ok(false) => {}
                    Err(e) => log.row_failed(ContentKind::Asset, asset.external_key, e),
                }
            }
            tracing::info!(
                batch_offset = offset,
                batch_len = batch.len(),
                migrated = log.new_assets - before,
                "Processed asset batch"
            );

            if (batch.len() as i64) < limit {
                break;
            }
            offset += batch.len() as i64;
        }
        Ok(())
    }

    /// `Ok(true)` when a new link was created.
    async fn migrate_asset(
        &self,
        asset: &LegacyAsset,
        default: &StorageSource,
    ) -> Result<bool, AppError> {
        if self.repos.links.link_exists(ContentKind::Asset, asset.id).await? {
            return Ok(false);
        }
        let file_name = match asset.file_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(false),
        };

        let object = self
            .repos
            .objects
            .insert(NewExternalObject {
                source_id: default.id,
                mime_type: DEFAULT_MIME_TYPE.to_string(),
                file_id: file_name.to_string(),
            })
            .await?;
        self.repos
            .links
            .link(ContentKind::Asset, asset.id, object.id)
            .await?;
        Ok(true)
    }

    async fn migrate_media(
        &self,
        sources: &RunSources,
        base: &str,
        limit: i64,
        log: &mut RunLog,
    ) -> Result<(), AppError> {
        let mut offset = 0i64;
        loop {
            let batch = self.repos.legacy.list_media(offset, limit).await?;
            if batch.is_empty() {
                break;
            }

            let before = log.new_media;
            for media in &batch {
                match self.migrate_one_media(media, sources, base).await {
                    Ok(true) => log.new_media += 1,
                    Ok(false) => {}
                    Err(e) => log.row_failed(ContentKind::Media, media.external_key, e),
                }
            }
            tracing::info!(
                batch_offset = offset,
                batch_len = batch.len(),
                migrated = log.new_media - before,
                "Processed media batch"
            );

            if (batch.len() as i64) < limit {
                break;
            }
            offset += batch.len() as i64;
        }
        Ok(())
    }

    async fn migrate_one_media(
        &self,
        media: &LegacyMedia,
        sources: &RunSources,
        base: &str,
    ) -> Result<bool, AppError> {
        let url = match media.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return Ok(false),
        };
        if self.repos.links.link_exists(ContentKind::Media, media.id).await? {
            return Ok(false);
        }

        let (source, file_id) = match classify_media_url(url, base) {
            MediaPlacement::Default(relative) => (&sources.default, relative),
            MediaPlacement::Direct(full) => (&sources.direct, full),
        };
        let mime_type = media
            .mime_type
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        let object = self
            .repos
            .objects
            .insert(NewExternalObject {
                source_id: source.id,
                mime_type,
                file_id,
            })
            .await?;
        self.repos
            .links
            .link(ContentKind::Media, media.id, object.id)
            .await?;
        Ok(true)
    }

    async fn finish(&self, mut log: RunLog, fatal: Option<String>) -> MigrationResult {
        let status = match self.status.status().await {
            Ok(status) => status,
            Err(e) => {
                let message = format!("Failed to recompute migration status: {}", e);
                log.errors.push(message);
                MigrationStatus {
                    default_source_external_key: log.default_source.as_ref().map(|s| s.external_key),
                    ..Default::default()
                }
            }
        };
        if let Some(message) = &fatal {
            tracing::error!(error = %message, "Migration aborted");
            log.errors.push(message.clone());
        }

        let success = fatal.is_none();
        let state = if log.errors.is_empty() {
            MigrationState::Completed
        } else {
            MigrationState::CompletedWithErrors
        };
        let message = match (&fatal, log.errors.len()) {
            (Some(reason), _) => reason.clone(),
            (None, 0) => format!(
                "Migration completed: {} assets and {} media sources migrated",
                log.new_assets, log.new_media
            ),
            (None, n) => format!(
                "Migration completed with {} errors: {} assets and {} media sources migrated",
                n, log.new_assets, log.new_media
            ),
        };
        tracing::info!(
            success,
            new_assets = log.new_assets,
            new_media = log.new_media,
            errors = log.errors.len(),
            "Migration finished"
        );

        MigrationResult {
            success,
            state,
            status: MigrationStatus {
                in_progress: false,
                errors: log.errors,
                start_time: Some(log.started),
                end_time: Some(Utc::now()),
                ..status
            },
            message,
            newly_migrated_assets: log.new_assets,
            newly_migrated_media_sources: log.new_media,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_db::MemoryStore;

    const BASE: &str = "https://assets.example.com";

    fn engine(store: &MemoryStore) -> MigrationEngine {
        MigrationEngine::new(Repositories::in_memory(store.clone()))
    }

    fn object_for_file(store: &MemoryStore, file_id: &str) -> curio_core::models::ExternalObject {
        store
            .objects()
            .into_iter()
            .find(|o| o.file_id == file_id)
            .unwrap_or_else(|| panic!("no object with file id {}", file_id))
    }

    fn source_named(store: &MemoryStore, name: &str) -> StorageSource {
        store
            .sources()
            .into_iter()
            .find(|s| s.display_name == name)
            .unwrap()
    }

    #[tokio::test]
    async fn test_media_classification_end_to_end() {
        let store = MemoryStore::new();
        store.add_media(Some("https://assets.example.com/foo/bar.png"), Some("image/png"));
        store.add_media(Some("https://cdn.other.com/x.png"), None);
        store.add_media(Some("songs/1.mp3"), Some("audio/mpeg"));

        let result = engine(&store).migrate(BASE, 50).await.unwrap();
        assert!(result.success, "{}", result.message);
        assert_eq!(result.state, MigrationState::Completed);
        assert_eq!(result.newly_migrated_media_sources, 3);

        let default = source_named(&store, DEFAULT_SOURCE_NAME);
        let direct = source_named(&store, DIRECT_URL_SOURCE_NAME);
        assert_eq!(
            default.endpoint_template.as_deref(),
            Some("https://assets.example.com/{FILE_ID}")
        );
        assert_eq!(direct.endpoint_template.as_deref(), Some("{FILE_ID}"));

        let same_host = object_for_file(&store, "foo/bar.png");
        assert_eq!(same_host.source_id, default.id);
        assert_eq!(same_host.mime_type, "image/png");

        let foreign = object_for_file(&store, "https://cdn.other.com/x.png");
        assert_eq!(foreign.source_id, direct.id);
        assert_eq!(foreign.mime_type, DEFAULT_MIME_TYPE);

        assert_eq!(object_for_file(&store, "songs/1.mp3").source_id, default.id);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let store = MemoryStore::new();
        store.add_asset(Some("cover.jpg"));
        store.add_asset(None);
        store.add_media(Some("songs/1.mp3"), None);
        store.add_media(None, None);
        let engine = engine(&store);

        let first = engine.migrate(BASE, 50).await.unwrap();
        assert_eq!(first.newly_migrated_assets, 1);
        assert_eq!(first.newly_migrated_media_sources, 1);

        let second = engine.migrate(BASE, 50).await.unwrap();
        assert!(second.success);
        assert_eq!(second.newly_migrated_assets, 0);
        assert_eq!(second.newly_migrated_media_sources, 0);
        assert_eq!(second.status.migrated_assets, 1);
        assert_eq!(second.status.total_assets, 2);
        assert_eq!(store.objects().len(), 2);
        assert_eq!(store.sources().len(), 2);
    }

    #[tokio::test]
    async fn test_small_batches_cover_every_row() {
        let store = MemoryStore::new();
        for i in 0..7 {
            store.add_asset(Some(&format!("file-{}.png", i)));
        }

        let result = engine(&store).migrate(BASE, 3).await.unwrap();
        assert_eq!(result.newly_migrated_assets, 7);
        assert_eq!(result.status.migrated_assets, 7);
        assert!(result.status.completed);
        assert!(result.status.start_time.is_some());
        assert!(result.status.end_time >= result.status.start_time);
    }

    #[tokio::test]
    async fn test_row_failure_does_not_stop_the_batch() {
        let store = MemoryStore::new();
        store.add_asset(Some("a.png"));
        store.add_asset(Some("bad.png"));
        store.add_asset(Some("c.png"));
        store.fail_writes_for("bad.png");

        let result = engine(&store).migrate(BASE, 50).await.unwrap();
        assert!(result.success);
        assert_eq!(result.state, MigrationState::CompletedWithErrors);
        assert_eq!(result.status.errors.len(), 1);
        assert_eq!(result.newly_migrated_assets, 2);
        assert!(!result.status.completed);
    }

    #[tokio::test]
    async fn test_media_row_failure_does_not_stop_the_batch() {
        let store = MemoryStore::new();
        store.add_media(Some("https://assets.example.com/songs/bad.mp3"), None);
        store.add_media(Some("https://cdn.other.com/x.png"), None);
        store.add_media(Some("songs/2.mp3"), None);
        store.fail_writes_for("songs/bad.mp3");

        let result = engine(&store).migrate(BASE, 2).await.unwrap();
        assert!(result.success);
        assert_eq!(result.state, MigrationState::CompletedWithErrors);
        assert_eq!(result.status.errors.len(), 1);
        assert_eq!(result.newly_migrated_media_sources, 2);
        assert_eq!(result.status.migrated_media_sources, 2);
        assert!(store.objects().iter().all(|o| o.file_id != "songs/bad.mp3"));
    }

    #[tokio::test]
    async fn test_unreadable_batch_is_structural() {
        let store = MemoryStore::new();
        store.add_asset(Some("a.png"));
        store.set_legacy_reads_failing(true);

        let result = engine(&store).migrate(BASE, 50).await.unwrap();
        assert!(!result.success);
        assert!(result.message.contains("asset batch"));
        assert!(result.status.errors.iter().any(|e| e.contains("asset batch")));
        assert!(result.status.default_source_external_key.is_some());
    }

    #[tokio::test]
    async fn test_rejects_bad_arguments() {
        let store = MemoryStore::new();
        assert!(engine(&store).migrate("  ", 50).await.is_err());
        assert!(engine(&store).migrate(BASE, 0).await.is_err());
        assert!(store.sources().is_empty());
    }
}
