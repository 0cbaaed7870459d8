//! Repository trait abstractions
//!
//! These traits are the only way services touch persisted state, so the
//! migration engine and resolver can run against any backing store.
//! None of them spans more than one statement: every write is an
//! independent, retryable step.

use async_trait::async_trait;
use curio_core::models::{
    ContentKind, ExternalObject, LegacyAsset, LegacyMedia, NewExternalObject, NewStorageSource,
    StorageSource,
};
use curio_core::{AppError, ExternalKey, SourceKind};

#[async_trait]
pub trait StorageSourceRepo: Send + Sync {
    /// First source with this display name, in creation order.
    async fn find_by_name(&self, display_name: &str) -> Result<Option<StorageSource>, AppError>;

    async fn insert(&self, source: NewStorageSource) -> Result<StorageSource, AppError>;

    /// All replica sources sharing a display name and kind, in creation order.
    async fn list_by_name_and_kind(
        &self,
        display_name: &str,
        kind: SourceKind,
    ) -> Result<Vec<StorageSource>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<StorageSource>, AppError>;
}

#[async_trait]
pub trait ExternalObjectRepo: Send + Sync {
    async fn insert(&self, object: NewExternalObject) -> Result<ExternalObject, AppError>;

    async fn get(&self, id: i64) -> Result<Option<ExternalObject>, AppError>;

    /// Objects whose file identifier contains `needle` anywhere.
    async fn find_file_id_containing(&self, needle: &str)
        -> Result<Vec<ExternalObject>, AppError>;

    async fn update_file_id(&self, id: i64, file_id: &str) -> Result<(), AppError>;

    /// Objects pointing at a source that no longer exists.
    async fn count_missing_source(&self) -> Result<i64, AppError>;

    /// Objects not linked to any asset or media row.
    async fn count_orphaned(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait LinkRepo: Send + Sync {
    async fn link_exists(&self, kind: ContentKind, content_id: i64) -> Result<bool, AppError>;

    async fn link(&self, kind: ContentKind, content_id: i64, object_id: i64)
        -> Result<(), AppError>;

    /// Distinct legacy rows of `kind` with at least one link.
    async fn count_linked(&self, kind: ContentKind) -> Result<i64, AppError>;

    /// Links of either kind whose external object is missing.
    async fn count_dangling(&self) -> Result<i64, AppError>;

    /// The earliest object linked to a legacy row, if any.
    async fn object_for(
        &self,
        kind: ContentKind,
        content_id: i64,
    ) -> Result<Option<ExternalObject>, AppError>;
}

#[async_trait]
pub trait LegacyContentRepo: Send + Sync {
    async fn count(&self, kind: ContentKind) -> Result<i64, AppError>;

    /// Assets ordered by id, `limit` rows starting at `offset`.
    async fn list_assets(&self, offset: i64, limit: i64) -> Result<Vec<LegacyAsset>, AppError>;

    /// Media sources ordered by id, `limit` rows starting at `offset`.
    async fn list_media(&self, offset: i64, limit: i64) -> Result<Vec<LegacyMedia>, AppError>;

    async fn get_asset(&self, id: i64) -> Result<Option<LegacyAsset>, AppError>;

    async fn get_media(&self, id: i64) -> Result<Option<LegacyMedia>, AppError>;
}

/// Maps a public key to the internal id of a legacy row.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, kind: ContentKind, key: ExternalKey) -> Result<Option<i64>, AppError>;
}
