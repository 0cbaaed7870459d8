//! Storage source repository: lookups and inserts for the storage_source table.

use async_trait::async_trait;
use curio_core::models::{NewStorageSource, StorageSource};
use curio_core::{AppError, ExternalKey, SourceKind};
use sqlx::{PgPool, Postgres};

use super::traits::StorageSourceRepo;

/// Row type for storage_source table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct StorageSourceRow {
    pub id: i64,
    pub external_key: ExternalKey,
    pub kind: SourceKind,
    pub display_name: String,
    pub endpoint_template: Option<String>,
}

impl StorageSourceRow {
    pub fn to_storage_source(self) -> StorageSource {
        StorageSource {
            id: self.id,
            external_key: self.external_key,
            kind: self.kind,
            display_name: self.display_name,
            endpoint_template: self.endpoint_template,
        }
    }
}

/// Repository for storage_source table.
#[derive(Clone)]
pub struct StorageSourceRepository {
    pool: PgPool,
}

impl StorageSourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StorageSourceRepo for StorageSourceRepository {
    #[tracing::instrument(skip(self), fields(db.table = "storage_source", db.operation = "select"))]
    async fn find_by_name(&self, display_name: &str) -> Result<Option<StorageSource>, AppError> {
        let row = sqlx::query_as::<Postgres, StorageSourceRow>(
            r#"
            SELECT id, external_key, kind, display_name, endpoint_template
            FROM storage_source
            WHERE display_name = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StorageSourceRow::to_storage_source))
    }

    #[tracing::instrument(skip(self), fields(db.table = "storage_source", db.operation = "insert"))]
    async fn insert(&self, source: NewStorageSource) -> Result<StorageSource, AppError> {
        let row = sqlx::query_as::<Postgres, StorageSourceRow>(
            r#"
            INSERT INTO storage_source (external_key, kind, display_name, endpoint_template)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_key, kind, display_name, endpoint_template
            "#,
        )
        .bind(ExternalKey::new())
        .bind(source.kind)
        .bind(&source.display_name)
        .bind(&source.endpoint_template)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.to_storage_source())
    }

    #[tracing::instrument(skip(self), fields(db.table = "storage_source", db.operation = "select"))]
    async fn list_by_name_and_kind(
        &self,
        display_name: &str,
        kind: SourceKind,
    ) -> Result<Vec<StorageSource>, AppError> {
        let rows = sqlx::query_as::<Postgres, StorageSourceRow>(
            r#"
            SELECT id, external_key, kind, display_name, endpoint_template
            FROM storage_source
            WHERE display_name = $1 AND kind = $2
            ORDER BY id ASC
            "#,
        )
        .bind(display_name)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(StorageSourceRow::to_storage_source)
            .collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "storage_source", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i64) -> Result<Option<StorageSource>, AppError> {
        let row = sqlx::query_as::<Postgres, StorageSourceRow>(
            "SELECT id, external_key, kind, display_name, endpoint_template FROM storage_source WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StorageSourceRow::to_storage_source))
    }
}
