//! Read access to the legacy asset and media_source tables.

use async_trait::async_trait;
use curio_core::models::{ContentKind, LegacyAsset, LegacyMedia};
use curio_core::{AppError, ExternalKey};
use sqlx::{PgPool, Postgres};

use super::traits::LegacyContentRepo;

#[derive(Debug, sqlx::FromRow)]
pub struct LegacyAssetRow {
    pub id: i64,
    pub external_key: ExternalKey,
    pub file_id: Option<String>,
}

impl LegacyAssetRow {
    pub fn to_legacy_asset(self) -> LegacyAsset {
        LegacyAsset {
            id: self.id,
            external_key: self.external_key,
            file_name: self.file_id,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct LegacyMediaRow {
    pub id: i64,
    pub external_key: ExternalKey,
    pub url: Option<String>,
    pub mime_type: Option<String>,
}

impl LegacyMediaRow {
    pub fn to_legacy_media(self) -> LegacyMedia {
        LegacyMedia {
            id: self.id,
            external_key: self.external_key,
            url: self.url,
            mime_type: self.mime_type,
        }
    }
}

/// Repository for the legacy content tables.
#[derive(Clone)]
pub struct LegacyContentRepository {
    pool: PgPool,
}

impl LegacyContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LegacyContentRepo for LegacyContentRepository {
    #[tracing::instrument(skip(self), fields(db.operation = "count", content.kind = %kind))]
    async fn count(&self, kind: ContentKind) -> Result<i64, AppError> {
        let sql = match kind {
            ContentKind::Asset => "SELECT COUNT(*) FROM asset",
            ContentKind::Media => "SELECT COUNT(*) FROM media_source",
        };
        let count = sqlx::query_scalar::<Postgres, i64>(sql)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "asset", db.operation = "select"))]
    async fn list_assets(&self, offset: i64, limit: i64) -> Result<Vec<LegacyAsset>, AppError> {
        let rows = sqlx::query_as::<Postgres, LegacyAssetRow>(
            "SELECT id, external_key, file_id FROM asset ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LegacyAssetRow::to_legacy_asset).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_source", db.operation = "select"))]
    async fn list_media(&self, offset: i64, limit: i64) -> Result<Vec<LegacyMedia>, AppError> {
        let rows = sqlx::query_as::<Postgres, LegacyMediaRow>(
            "SELECT id, external_key, url, mime_type FROM media_source ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LegacyMediaRow::to_legacy_media).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "asset", db.operation = "select", db.record_id = %id))]
    async fn get_asset(&self, id: i64) -> Result<Option<LegacyAsset>, AppError> {
        let row = sqlx::query_as::<Postgres, LegacyAssetRow>(
            "SELECT id, external_key, file_id FROM asset WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LegacyAssetRow::to_legacy_asset))
    }

    #[tracing::instrument(skip(self), fields(db.table = "media_source", db.operation = "select", db.record_id = %id))]
    async fn get_media(&self, id: i64) -> Result<Option<LegacyMedia>, AppError> {
        let row = sqlx::query_as::<Postgres, LegacyMediaRow>(
            "SELECT id, external_key, url, mime_type FROM media_source WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LegacyMediaRow::to_legacy_media))
    }
}
