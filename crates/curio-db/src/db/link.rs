//! Link repository: junctions between legacy rows and external objects.
//!
//! A link is created once and never updated. Its existence is what marks a
//! legacy row as migrated.

use async_trait::async_trait;
use curio_core::models::{ContentKind, ExternalObject};
use curio_core::AppError;
use sqlx::{PgPool, Postgres};

use super::external_object::ExternalObjectRow;
use super::traits::LinkRepo;

/// Junction table and its legacy-row column for a content kind.
fn junction(kind: ContentKind) -> (&'static str, &'static str) {
    match kind {
        ContentKind::Asset => ("asset_external_object", "asset_id"),
        ContentKind::Media => ("media_external_object", "media_id"),
    }
}

/// Repository for asset_external_object and media_external_object tables.
#[derive(Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepo for LinkRepository {
    #[tracing::instrument(skip(self), fields(db.operation = "select", content.kind = %kind))]
    async fn link_exists(&self, kind: ContentKind, content_id: i64) -> Result<bool, AppError> {
        let (table, column) = junction(kind);
        let exists = sqlx::query_scalar::<Postgres, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)",
            table, column
        ))
        .bind(content_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "insert", content.kind = %kind))]
    async fn link(
        &self,
        kind: ContentKind,
        content_id: i64,
        object_id: i64,
    ) -> Result<(), AppError> {
        let (table, column) = junction(kind);
        sqlx::query(&format!(
            "INSERT INTO {} ({}, external_object_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            table, column
        ))
        .bind(content_id)
        .bind(object_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.operation = "count", content.kind = %kind))]
    async fn count_linked(&self, kind: ContentKind) -> Result<i64, AppError> {
        let (table, column) = junction(kind);
        let count = sqlx::query_scalar::<Postgres, i64>(&format!(
            "SELECT COUNT(DISTINCT {}) FROM {}",
            column, table
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "count"))]
    async fn count_dangling(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT
              (SELECT COUNT(*) FROM asset_external_object l
                 LEFT JOIN external_object eo ON eo.id = l.external_object_id
                 WHERE eo.id IS NULL)
              +
              (SELECT COUNT(*) FROM media_external_object l
                 LEFT JOIN external_object eo ON eo.id = l.external_object_id
                 WHERE eo.id IS NULL)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "select", content.kind = %kind))]
    async fn object_for(
        &self,
        kind: ContentKind,
        content_id: i64,
    ) -> Result<Option<ExternalObject>, AppError> {
        let (table, column) = junction(kind);
        let row = sqlx::query_as::<Postgres, ExternalObjectRow>(&format!(
            r#"
            SELECT eo.id, eo.external_key, eo.source_id, eo.mime_type, eo.file_id
            FROM {} l
            JOIN external_object eo ON eo.id = l.external_object_id
            WHERE l.{} = $1
            ORDER BY eo.id ASC
            LIMIT 1
            "#,
            table, column
        ))
        .bind(content_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ExternalObjectRow::to_external_object))
    }
}
