//! Postgres-backed document store.
//!
//! Documents live in a single `documents` table keyed by (collection, id)
//! with the body in a JSONB column (see `migrations/`). Batches run inside
//! one database transaction, which is what makes [`DocumentStore::apply`]
//! atomic and lets checkout pair stock decrements with order writes.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Row};

use super::{DocumentStore, Query, SortOrder, StoreError, WriteBatch, WriteOp};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Document store over a `PostgreSQL` JSONB table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool (health checks, migrations).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Run one batch op inside the given transaction.
async fn run_op(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    op: &WriteOp,
) -> Result<(), StoreError> {
    match op {
        WriteOp::Insert {
            collection,
            id,
            data,
        } => {
            let result = sqlx::query(
                "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
                 ON CONFLICT (collection, id) DO NOTHING",
            )
            .bind(collection)
            .bind(id)
            .bind(data)
            .execute(&mut **tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::AlreadyExists {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }
            Ok(())
        }
        WriteOp::Update {
            collection,
            id,
            patch,
        } => {
            let result = sqlx::query(
                "UPDATE documents SET data = data || $3, updated_at = now() \
                 WHERE collection = $1 AND id = $2",
            )
            .bind(collection)
            .bind(id)
            .bind(patch)
            .execute(&mut **tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }
            Ok(())
        }
        WriteOp::Increment {
            collection,
            id,
            field,
            delta,
            floor,
        } => {
            // Single conditional update: the arithmetic and the floor check
            // happen in one statement, so concurrent decrements cannot both
            // consume the same units.
            let result = sqlx::query(
                "UPDATE documents \
                 SET data = jsonb_set(data, ARRAY[$3]::text[], \
                     to_jsonb((data ->> $3)::bigint + $4::bigint)), \
                     updated_at = now() \
                 WHERE collection = $1 AND id = $2 \
                   AND ($5::bigint IS NULL OR (data ->> $3)::bigint + $4::bigint >= $5::bigint)",
            )
            .bind(collection)
            .bind(id)
            .bind(field)
            .bind(delta)
            .bind(*floor)
            .execute(&mut **tx)
            .await?;
            if result.rows_affected() == 0 {
                let exists =
                    sqlx::query("SELECT 1 FROM documents WHERE collection = $1 AND id = $2")
                        .bind(collection)
                        .bind(id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .is_some();
                return Err(if exists {
                    StoreError::ConditionFailed {
                        collection: collection.clone(),
                        id: id.clone(),
                        condition: format!("{field} + {delta} >= {}", floor.unwrap_or(i64::MIN)),
                    }
                } else {
                    StoreError::NotFound {
                        collection: collection.clone(),
                        id: id.clone(),
                    }
                });
            }
            Ok(())
        }
        WriteOp::Delete { collection, id } => {
            let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .execute(&mut **tx)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                });
            }
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| row.try_get("data")).transpose().map_err(Into::into)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT data FROM documents WHERE collection = ");
        builder.push_bind(collection);

        for filter in &query.filters {
            builder.push(" AND data -> ");
            builder.push_bind(&filter.field);
            builder.push(" = ");
            builder.push_bind(&filter.value);
        }

        if let Some(order) = &query.order_by {
            // Text extraction is fine for the fields we order by (ISO-8601
            // timestamps and order numbers); numeric fields would need a cast.
            builder.push(" ORDER BY data ->> ");
            builder.push_bind(&order.field);
            builder.push(match order.direction {
                SortOrder::Ascending => " ASC",
                SortOrder::Descending => " DESC",
            });
        }

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        if let Some(offset) = query.offset {
            builder.push(" OFFSET ");
            builder.push_bind(offset);
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| row.try_get("data").map_err(Into::into))
            .collect()
    }

    async fn add(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection)
        .bind(id)
        .bind(&data)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(&patch)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for op in batch.ops() {
            // An error drops the transaction, rolling back everything
            // applied so far.
            run_op(&mut tx, op).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
