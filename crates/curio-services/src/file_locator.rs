//! Public key to download URL, for the file redirect endpoint
//!
//! Linked rows resolve through their external object. Rows the migration has
//! not reached yet still resolve from their legacy reference.

use curio_core::models::ContentKind;
use curio_core::validation::is_absolute_http_url;
use curio_core::{AppError, ExternalKey};
use curio_db::Repositories;
use curio_storage::{join_gateway, UrlResolver};

/// Where a key points and how that was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLocation {
    /// Resolved through a linked external object.
    Resolved { kind: ContentKind, url: String },
    /// Built from the inline legacy column of an unmigrated row.
    Legacy { kind: ContentKind, url: String },
}

impl FileLocation {
    pub fn url(&self) -> &str {
        match self {
            FileLocation::Resolved { url, .. } | FileLocation::Legacy { url, .. } => url,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            FileLocation::Resolved { kind, .. } | FileLocation::Legacy { kind, .. } => *kind,
        }
    }
}

#[derive(Clone)]
pub struct FileLocator {
    repos: Repositories,
    resolver: UrlResolver,
    asset_base_url: Option<String>,
}

impl FileLocator {
    pub fn new(repos: Repositories, resolver: UrlResolver, asset_base_url: Option<String>) -> Self {
        Self {
            repos,
            resolver,
            asset_base_url,
        }
    }

    /// Media keys are tried before asset keys. `None` means nothing resolvable.
    #[tracing::instrument(skip(self), fields(key = %key))]
    pub async fn locate(&self, key: ExternalKey) -> Result<Option<FileLocation>, AppError> {
        for kind in [ContentKind::Media, ContentKind::Asset] {
            if let Some(content_id) = self.repos.keys.resolve(kind, key).await? {
                return self.locate_row(kind, content_id).await;
            }
        }
        Ok(None)
    }

    async fn locate_row(
        &self,
        kind: ContentKind,
        content_id: i64,
    ) -> Result<Option<FileLocation>, AppError> {
        if let Some(object) = self.repos.links.object_for(kind, content_id).await? {
            match self.repos.sources.get(object.source_id).await? {
                Some(source) => {
                    let url = self.resolver.resolve(&source, &object.file_id).await;
                    return Ok(Some(FileLocation::Resolved { kind, url }));
                }
                None => {
                    tracing::warn!(
                        object_key = %object.external_key,
                        source_id = object.source_id,
                        "External object references a missing storage source"
                    );
                }
            }
        }

        let reference = match kind {
            ContentKind::Media => self
                .repos
                .legacy
                .get_media(content_id)
                .await?
                .and_then(|m| m.url),
            ContentKind::Asset => self
                .repos
                .legacy
                .get_asset(content_id)
                .await?
                .and_then(|a| a.file_name),
        };
        let reference = match reference.map(|r| r.trim().to_string()) {
            Some(r) if !r.is_empty() => r,
            _ => return Ok(None),
        };

        if kind == ContentKind::Media && is_absolute_http_url(&reference) {
            return Ok(Some(FileLocation::Legacy {
                kind,
                url: reference,
            }));
        }
        Ok(self.asset_base_url.as_deref().map(|base| FileLocation::Legacy {
            kind,
            url: join_gateway(base, &reference),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use curio_core::models::NewStorageSource;
    use curio_core::SourceKind;
    use curio_db::MemoryStore;
    use curio_storage::StaticGateways;

    const BASE: &str = "https://assets.example.com";

    fn locator(store: &MemoryStore, gateways: Vec<String>, base: Option<&str>) -> FileLocator {
        FileLocator::new(
            Repositories::in_memory(store.clone()),
            UrlResolver::new(Arc::new(StaticGateways(gateways))),
            base.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_linked_asset_resolves_through_template() {
        let store = MemoryStore::new();
        let source = store.add_source(NewStorageSource {
            kind: SourceKind::DirectUrl,
            display_name: "Default Asset Storage".to_string(),
            endpoint_template: Some(format!("{}/{{FILE_ID}}", BASE)),
        });
        let asset = store.add_asset(Some("a.png"));
        let object = store.add_object(source.id, "a.png");
        store.add_link(ContentKind::Asset, asset.id, object.id);

        let location = locator(&store, Vec::new(), None)
            .locate(asset.external_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            location,
            FileLocation::Resolved {
                kind: ContentKind::Asset,
                url: "https://assets.example.com/a.png".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_linked_ipfs_media_uses_gateway() {
        let store = MemoryStore::new();
        let source = store.add_source(NewStorageSource {
            kind: SourceKind::Ipfs,
            display_name: "Pinned".to_string(),
            endpoint_template: Some("https://ipfs.io/ipfs/{FILE_ID}".to_string()),
        });
        let media = store.add_media(None, None);
        let object = store.add_object(source.id, "bafyabc");
        store.add_link(ContentKind::Media, media.id, object.id);

        let location = locator(&store, vec!["https://dweb.link/ipfs/".to_string()], None)
            .locate(media.external_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(location.url(), "https://dweb.link/ipfs/bafyabc");
        assert_eq!(location.kind(), ContentKind::Media);
    }

    #[tokio::test]
    async fn test_unmigrated_rows_use_legacy_reference() {
        let store = MemoryStore::new();
        let absolute = store.add_media(Some("https://cdn.other.com/x.png"), None);
        let relative = store.add_media(Some("songs/1.mp3"), None);
        let asset = store.add_asset(Some("covers/a.png"));

        let with_base = locator(&store, Vec::new(), Some(BASE));
        assert_eq!(
            with_base.locate(absolute.external_key).await.unwrap().unwrap().url(),
            "https://cdn.other.com/x.png"
        );
        assert_eq!(
            with_base.locate(relative.external_key).await.unwrap().unwrap().url(),
            "https://assets.example.com/songs/1.mp3"
        );
        assert_eq!(
            with_base.locate(asset.external_key).await.unwrap().unwrap(),
            FileLocation::Legacy {
                kind: ContentKind::Asset,
                url: "https://assets.example.com/covers/a.png".to_string()
            }
        );

        let without_base = locator(&store, Vec::new(), None);
        assert!(without_base.locate(relative.external_key).await.unwrap().is_none());
        assert!(without_base.locate(absolute.external_key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_or_empty_keys_are_none() {
        let store = MemoryStore::new();
        let empty = store.add_asset(None);
        let locator = locator(&store, Vec::new(), Some(BASE));

        assert!(locator.locate(ExternalKey::new()).await.unwrap().is_none());
        assert!(locator.locate(empty.external_key).await.unwrap().is_none());
    }
}
