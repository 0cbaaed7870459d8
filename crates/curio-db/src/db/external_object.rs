//! External object repository: the indirection records behind every migrated file.

use async_trait::async_trait;
use curio_core::models::{ExternalObject, NewExternalObject};
use curio_core::{AppError, ExternalKey};
use sqlx::{PgPool, Postgres};

use super::traits::ExternalObjectRepo;

/// Row type for external_object table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct ExternalObjectRow {
    pub id: i64,
    pub external_key: ExternalKey,
    pub source_id: i64,
    pub mime_type: String,
    pub file_id: String,
}

impl ExternalObjectRow {
    pub fn to_external_object(self) -> ExternalObject {
        ExternalObject {
            id: self.id,
            external_key: self.external_key,
            source_id: self.source_id,
            mime_type: self.mime_type,
            file_id: self.file_id,
        }
    }
}

/// Escape LIKE metacharacters so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Repository for external_object table.
#[derive(Clone)]
pub struct ExternalObjectRepository {
    pool: PgPool,
}

impl ExternalObjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExternalObjectRepo for ExternalObjectRepository {
    #[tracing::instrument(skip(self), fields(db.table = "external_object", db.operation = "insert"))]
    async fn insert(&self, object: NewExternalObject) -> Result<ExternalObject, AppError> {
        let row = sqlx::query_as::<Postgres, ExternalObjectRow>(
            r#"
            INSERT INTO external_object (external_key, source_id, mime_type, file_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_key, source_id, mime_type, file_id
            "#,
        )
        .bind(ExternalKey::new())
        .bind(object.source_id)
        .bind(&object.mime_type)
        .bind(&object.file_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.to_external_object())
    }

    #[tracing::instrument(skip(self), fields(db.table = "external_object", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i64) -> Result<Option<ExternalObject>, AppError> {
        let row = sqlx::query_as::<Postgres, ExternalObjectRow>(
            "SELECT id, external_key, source_id, mime_type, file_id FROM external_object WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ExternalObjectRow::to_external_object))
    }

    #[tracing::instrument(skip(self), fields(db.table = "external_object", db.operation = "select"))]
    async fn find_file_id_containing(
        &self,
        needle: &str,
    ) -> Result<Vec<ExternalObject>, AppError> {
        let rows = sqlx::query_as::<Postgres, ExternalObjectRow>(
            r#"
            SELECT id, external_key, source_id, mime_type, file_id
            FROM external_object
            WHERE file_id LIKE $1 ESCAPE '\'
            ORDER BY id ASC
            "#,
        )
        .bind(like_pattern(needle))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(ExternalObjectRow::to_external_object)
            .collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "external_object", db.operation = "update", db.record_id = %id))]
    async fn update_file_id(&self, id: i64, file_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE external_object SET file_id = $1 WHERE id = $2")
            .bind(file_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("External object {} not found", id)));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "external_object", db.operation = "count"))]
    async fn count_missing_source(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM external_object eo
            LEFT JOIN storage_source ss ON ss.id = eo.source_id
            WHERE ss.id IS NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(db.table = "external_object", db.operation = "count"))]
    async fn count_orphaned(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM external_object eo
            WHERE NOT EXISTS (SELECT 1 FROM asset_external_object a WHERE a.external_object_id = eo.id)
              AND NOT EXISTS (SELECT 1 FROM media_external_object m WHERE m.external_object_id = eo.id)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("https://a.example.com"), "%https://a.example.com%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
