use async_trait::async_trait;
use curio_core::models::ContentKind;
use curio_core::{AppError, ExternalKey};
use sqlx::{PgPool, Postgres};

use super::traits::KeyResolver;

/// Resolves external keys against the legacy tables' `external_key` columns.
#[derive(Clone)]
pub struct PgKeyResolver {
    pool: PgPool,
}

impl PgKeyResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyResolver for PgKeyResolver {
    #[tracing::instrument(skip(self), fields(db.operation = "select", content.kind = %kind))]
    async fn resolve(&self, kind: ContentKind, key: ExternalKey) -> Result<Option<i64>, AppError> {
        let sql = match kind {
            ContentKind::Asset => "SELECT id FROM asset WHERE external_key = $1",
            ContentKind::Media => "SELECT id FROM media_source WHERE external_key = $1",
        };
        let id = sqlx::query_scalar::<Postgres, i64>(sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id)
    }
}
