//! In-memory implementation of every repository trait
//!
//! Used by service and HTTP tests, and anywhere a throwaway store is handy.
//! Failures can be injected per file identifier (row-level) or for all legacy
//! reads (structural).

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use curio_core::models::{
    ContentKind, ExternalObject, LegacyAsset, LegacyMedia, NewExternalObject, NewStorageSource,
    StorageSource,
};
use curio_core::{AppError, ExternalKey, SourceKind};

use super::traits::{
    ExternalObjectRepo, KeyResolver, LegacyContentRepo, LinkRepo, StorageSourceRepo,
};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    sources: BTreeMap<i64, StorageSource>,
    objects: BTreeMap<i64, ExternalObject>,
    asset_links: BTreeSet<(i64, i64)>,
    media_links: BTreeSet<(i64, i64)>,
    assets: BTreeMap<i64, LegacyAsset>,
    media: BTreeMap<i64, LegacyMedia>,
    failing_file_ids: HashSet<String>,
    fail_legacy_reads: bool,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn links(&self, kind: ContentKind) -> &BTreeSet<(i64, i64)> {
        match kind {
            ContentKind::Asset => &self.asset_links,
            ContentKind::Media => &self.media_links,
        }
    }

    fn links_mut(&mut self, kind: ContentKind) -> &mut BTreeSet<(i64, i64)> {
        match kind {
            ContentKind::Asset => &mut self.asset_links,
            ContentKind::Media => &mut self.media_links,
        }
    }

    fn check_legacy_reads(&self) -> Result<(), AppError> {
        if self.fail_legacy_reads {
            return Err(AppError::Internal("legacy content is unavailable".to_string()));
        }
        Ok(())
    }
}

/// Shared in-memory store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }

    fn seed<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    pub fn add_asset(&self, file_name: Option<&str>) -> LegacyAsset {
        self.seed(|s| {
            let asset = LegacyAsset {
                id: s.allocate_id(),
                external_key: ExternalKey::new(),
                file_name: file_name.map(str::to_string),
            };
            s.assets.insert(asset.id, asset.clone());
            asset
        })
    }

    pub fn add_media(&self, url: Option<&str>, mime_type: Option<&str>) -> LegacyMedia {
        self.seed(|s| {
            let media = LegacyMedia {
                id: s.allocate_id(),
                external_key: ExternalKey::new(),
                url: url.map(str::to_string),
                mime_type: mime_type.map(str::to_string),
            };
            s.media.insert(media.id, media.clone());
            media
        })
    }

    pub fn add_source(&self, source: NewStorageSource) -> StorageSource {
        self.seed(|s| {
            let created = StorageSource {
                id: s.allocate_id(),
                external_key: ExternalKey::new(),
                kind: source.kind,
                display_name: source.display_name,
                endpoint_template: source.endpoint_template,
            };
            s.sources.insert(created.id, created.clone());
            created
        })
    }

    pub fn add_object(&self, source_id: i64, file_id: &str) -> ExternalObject {
        self.seed(|s| {
            let object = ExternalObject {
                id: s.allocate_id(),
                external_key: ExternalKey::new(),
                source_id,
                mime_type: curio_core::constants::DEFAULT_MIME_TYPE.to_string(),
                file_id: file_id.to_string(),
            };
            s.objects.insert(object.id, object.clone());
            object
        })
    }

    /// Insert a link without checking that either side exists.
    pub fn add_link(&self, kind: ContentKind, content_id: i64, object_id: i64) {
        self.seed(|s| {
            s.links_mut(kind).insert((content_id, object_id));
        })
    }

    /// Make every object insert or update writing this file identifier fail.
    pub fn fail_writes_for(&self, file_id: &str) {
        self.seed(|s| {
            s.failing_file_ids.insert(file_id.to_string());
        })
    }

    /// Make every legacy listing and count fail until cleared.
    pub fn set_legacy_reads_failing(&self, failing: bool) {
        self.seed(|s| s.fail_legacy_reads = failing)
    }

    pub fn objects(&self) -> Vec<ExternalObject> {
        self.seed(|s| s.objects.values().cloned().collect())
    }

    pub fn sources(&self) -> Vec<StorageSource> {
        self.seed(|s| s.sources.values().cloned().collect())
    }
}

#[async_trait]
impl StorageSourceRepo for MemoryStore {
    async fn find_by_name(&self, display_name: &str) -> Result<Option<StorageSource>, AppError> {
        Ok(self
            .state()?
            .sources
            .values()
            .find(|s| s.display_name == display_name)
            .cloned())
    }

    async fn insert(&self, source: NewStorageSource) -> Result<StorageSource, AppError> {
        let mut state = self.state()?;
        let created = StorageSource {
            id: state.allocate_id(),
            external_key: ExternalKey::new(),
            kind: source.kind,
            display_name: source.display_name,
            endpoint_template: source.endpoint_template,
        };
        state.sources.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_by_name_and_kind(
        &self,
        display_name: &str,
        kind: SourceKind,
    ) -> Result<Vec<StorageSource>, AppError> {
        Ok(self
            .state()?
            .sources
            .values()
            .filter(|s| s.display_name == display_name && s.kind == kind)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<StorageSource>, AppError> {
        Ok(self.state()?.sources.get(&id).cloned())
    }
}

#[async_trait]
impl ExternalObjectRepo for MemoryStore {
    async fn insert(&self, object: NewExternalObject) -> Result<ExternalObject, AppError> {
        let mut state = self.state()?;
        if state.failing_file_ids.contains(&object.file_id) {
            return Err(AppError::Internal(format!(
                "insert rejected for file id '{}'",
                object.file_id
            )));
        }
        let created = ExternalObject {
            id: state.allocate_id(),
            external_key: ExternalKey::new(),
            source_id: object.source_id,
            mime_type: object.mime_type,
            file_id: object.file_id,
        };
        state.objects.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<ExternalObject>, AppError> {
        Ok(self.state()?.objects.get(&id).cloned())
    }

    async fn find_file_id_containing(
        &self,
        needle: &str,
    ) -> Result<Vec<ExternalObject>, AppError> {
        Ok(self
            .state()?
            .objects
            .values()
            .filter(|o| o.file_id.contains(needle))
            .cloned()
            .collect())
    }

    async fn update_file_id(&self, id: i64, file_id: &str) -> Result<(), AppError> {
        let mut state = self.state()?;
        if state.failing_file_ids.contains(file_id) {
            return Err(AppError::Internal(format!(
                "update rejected for file id '{}'",
                file_id
            )));
        }
        match state.objects.get_mut(&id) {
            Some(object) => {
                object.file_id = file_id.to_string();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("External object {} not found", id))),
        }
    }

    async fn count_missing_source(&self) -> Result<i64, AppError> {
        let state = self.state()?;
        Ok(state
            .objects
            .values()
            .filter(|o| !state.sources.contains_key(&o.source_id))
            .count() as i64)
    }

    async fn count_orphaned(&self) -> Result<i64, AppError> {
        let state = self.state()?;
        let linked: HashSet<i64> = state
            .asset_links
            .iter()
            .chain(state.media_links.iter())
            .map(|(_, object_id)| *object_id)
            .collect();
        Ok(state
            .objects
            .keys()
            .filter(|id| !linked.contains(id))
            .count() as i64)
    }
}

#[async_trait]
impl LinkRepo for MemoryStore {
    async fn link_exists(&self, kind: ContentKind, content_id: i64) -> Result<bool, AppError> {
        Ok(self
            .state()?
            .links(kind)
            .iter()
            .any(|(content, _)| *content == content_id))
    }

    async fn link(
        &self,
        kind: ContentKind,
        content_id: i64,
        object_id: i64,
    ) -> Result<(), AppError> {
        self.state()?.links_mut(kind).insert((content_id, object_id));
        Ok(())
    }

    async fn count_linked(&self, kind: ContentKind) -> Result<i64, AppError> {
        let state = self.state()?;
        let distinct: BTreeSet<i64> = state.links(kind).iter().map(|(c, _)| *c).collect();
        Ok(distinct.len() as i64)
    }

    async fn count_dangling(&self) -> Result<i64, AppError> {
        let state = self.state()?;
        Ok(state
            .asset_links
            .iter()
            .chain(state.media_links.iter())
            .filter(|(_, object_id)| !state.objects.contains_key(object_id))
            .count() as i64)
    }

    async fn object_for(
        &self,
        kind: ContentKind,
        content_id: i64,
    ) -> Result<Option<ExternalObject>, AppError> {
        let state = self.state()?;
        Ok(state
            .links(kind)
            .iter()
            .filter(|(content, _)| *content == content_id)
            .find_map(|(_, object_id)| state.objects.get(object_id).cloned()))
    }
}

fn page<T: Clone>(rows: &BTreeMap<i64, T>, offset: i64, limit: i64) -> Vec<T> {
    rows.values()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl LegacyContentRepo for MemoryStore {
    async fn count(&self, kind: ContentKind) -> Result<i64, AppError> {
        let state = self.state()?;
        state.check_legacy_reads()?;
        Ok(match kind {
            ContentKind::Asset => state.assets.len() as i64,
            ContentKind::Media => state.media.len() as i64,
        })
    }

    async fn list_assets(&self, offset: i64, limit: i64) -> Result<Vec<LegacyAsset>, AppError> {
        let state = self.state()?;
        state.check_legacy_reads()?;
        Ok(page(&state.assets, offset, limit))
    }

    async fn list_media(&self, offset: i64, limit: i64) -> Result<Vec<LegacyMedia>, AppError> {
        let state = self.state()?;
        state.check_legacy_reads()?;
        Ok(page(&state.media, offset, limit))
    }

    async fn get_asset(&self, id: i64) -> Result<Option<LegacyAsset>, AppError> {
        Ok(self.state()?.assets.get(&id).cloned())
    }

    async fn get_media(&self, id: i64) -> Result<Option<LegacyMedia>, AppError> {
        Ok(self.state()?.media.get(&id).cloned())
    }
}

#[async_trait]
impl KeyResolver for MemoryStore {
    async fn resolve(&self, kind: ContentKind, key: ExternalKey) -> Result<Option<i64>, AppError> {
        let state = self.state()?;
        Ok(match kind {
            ContentKind::Asset => state
                .assets
                .values()
                .find(|a| a.external_key == key)
                .map(|a| a.id),
            ContentKind::Media => state
                .media
                .values()
                .find(|m| m.external_key == key)
                .map(|m| m.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_paging_is_ordered_by_id() {
        let store = MemoryStore::new();
        let first = store.add_asset(Some("a.png"));
        let second = store.add_asset(Some("b.png"));
        store.add_asset(None);

        let page = store.list_assets(0, 2).await.unwrap();
        assert_eq!(page, vec![first, second]);
        assert_eq!(store.list_assets(2, 2).await.unwrap().len(), 1);
        assert!(store.list_assets(3, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_integrity_counters() {
        let store = MemoryStore::new();
        let source = store.add_source(NewStorageSource {
            kind: SourceKind::DirectUrl,
            display_name: "Default Asset Storage".to_string(),
            endpoint_template: Some("https://a.example.com/{FILE_ID}".to_string()),
        });
        let asset = store.add_asset(Some("a.png"));
        let linked = store.add_object(source.id, "a.png");
        store.add_object(source.id, "orphan.png");
        store.add_object(999, "lost.png");
        store.add_link(ContentKind::Asset, asset.id, linked.id);
        store.add_link(ContentKind::Media, 77, 12345);

        assert_eq!(store.count_orphaned().await.unwrap(), 2);
        assert_eq!(store.count_missing_source().await.unwrap(), 1);
        assert_eq!(store.count_dangling().await.unwrap(), 1);
        assert_eq!(store.count_linked(ContentKind::Asset).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_key_resolution() {
        let store = MemoryStore::new();
        let media = store.add_media(Some("songs/1.mp3"), None);
        assert_eq!(
            store.resolve(ContentKind::Media, media.external_key).await.unwrap(),
            Some(media.id)
        );
        assert_eq!(
            store.resolve(ContentKind::Asset, media.external_key).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.fail_writes_for("bad.png");
        let result = ExternalObjectRepo::insert(
            &store,
            NewExternalObject {
                source_id: 1,
                mime_type: "image/png".to_string(),
                file_id: "bad.png".to_string(),
            },
        )
        .await;
        assert!(result.is_err());

        store.set_legacy_reads_failing(true);
        assert!(store.count(ContentKind::Asset).await.is_err());
    }
}
