//! `PostgreSQL` document store backend.
//!
//! Documents live in one `documents` table: `(collection, id)` primary key
//! and a JSONB `body`. Queries are built at runtime; the schema comes from
//! `migrations/`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{Collection, DocumentStore, StoreError};

/// Document store backed by a `PostgreSQL` JSONB table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::migrate::MigrateError` if a migration fails.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn read(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let body: Option<Value> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(body)
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            ",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create(
        &self,
        collection: Collection,
        id: &str,
        body: Value,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await;

        result.map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict(format!(
                    "{} document already exists for this id",
                    collection.as_str()
                ));
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let bodies: Vec<Value> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE collection = $1 AND body ->> $2 = $3",
        )
        .bind(collection.as_str())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Ok(bodies)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
