//! Document store access layer.
//!
//! Collections of JSON documents with get/query/add/update/delete primitives
//! and an atomic [`WriteBatch`]. Repositories receive the store as an
//! injected `Arc<dyn DocumentStore>`, so the Postgres implementation and the
//! in-memory test double are interchangeable.
//!
//! The store knows nothing about products or orders; the only concession to
//! the domain is [`WriteOp::Increment`], the conditional counter update that
//! checkout uses to consume stock without a check-then-act race.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::{PgStore, create_pool};

/// Errors surfaced by a document store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Insert collided with an existing document id.
    #[error("document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    /// A guarded write did not meet its condition; the whole batch was
    /// rolled back.
    #[error("condition failed on {collection}/{id}: {condition}")]
    ConditionFailed {
        collection: String,
        id: String,
        condition: String,
    },

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data is not in the expected shape (e.g. a counter field that
    /// is not a number).
    #[error("data corruption: {0}")]
    Corrupt(String),
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Field ordering for a query.
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Top-level document field to order by.
    pub field: String,
    pub direction: SortOrder,
}

/// An equality filter on a top-level document field.
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    /// Filter documents whose `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A query against one collection: conjunctive equality filters plus
/// optional ordering and pagination.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Order ascending by a top-level field.
    #[must_use]
    pub fn order_asc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: SortOrder::Ascending,
        });
        self
    }

    /// Order descending by a top-level field.
    #[must_use]
    pub fn order_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: SortOrder::Descending,
        });
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// One write in a batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Create a document; fails the batch if the id already exists.
    Insert {
        collection: String,
        id: String,
        data: Value,
    },
    /// Shallow-merge `patch` into an existing document's top-level fields.
    Update {
        collection: String,
        id: String,
        patch: Value,
    },
    /// Atomically add `delta` to a numeric top-level field. If `floor` is
    /// set and the result would fall below it, the batch fails with
    /// [`StoreError::ConditionFailed`].
    Increment {
        collection: String,
        id: String,
        field: String,
        delta: i64,
        floor: Option<i64>,
    },
    /// Remove a document; fails the batch if it does not exist.
    Delete { collection: String, id: String },
}

/// An ordered set of writes applied atomically: either every operation
/// takes effect or none does.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collection: impl Into<String>, id: impl Into<String>, data: Value) {
        self.ops.push(WriteOp::Insert {
            collection: collection.into(),
            id: id.into(),
            data,
        });
    }

    pub fn update(&mut self, collection: impl Into<String>, id: impl Into<String>, patch: Value) {
        self.ops.push(WriteOp::Update {
            collection: collection.into(),
            id: id.into(),
            patch,
        });
    }

    pub fn increment(
        &mut self,
        collection: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        delta: i64,
        floor: Option<i64>,
    ) {
        self.ops.push(WriteOp::Increment {
            collection: collection.into(),
            id: id.into(),
            field: field.into(),
            delta,
            floor,
        });
    }

    pub fn delete(&mut self, collection: impl Into<String>, id: impl Into<String>) {
        self.ops.push(WriteOp::Delete {
            collection: collection.into(),
            id: id.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// The operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }
}

/// Collection-oriented document storage.
///
/// Implementations provide per-document atomicity for the single-document
/// methods and all-or-nothing semantics for [`DocumentStore::apply`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch one document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Fetch documents matching a query.
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Create a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the id is taken.
    async fn add(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Shallow-merge `patch` into an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    /// Remove a document. Returns `true` if it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Apply a batch atomically.
    async fn apply(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder_accumulates() {
        let query = Query::new()
            .filter(Filter::eq("status", "active"))
            .order_desc("created_at")
            .limit(20)
            .offset(40);
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.limit, Some(20));
        assert_eq!(query.offset, Some(40));
        let order = query.order_by.expect("order_by set");
        assert_eq!(order.field, "created_at");
        assert_eq!(order.direction, SortOrder::Descending);
    }

    #[test]
    fn test_batch_preserves_op_order() {
        let mut batch = WriteBatch::new();
        batch.insert("orders", "o1", serde_json::json!({"status": "pending"}));
        batch.increment("products", "p1", "inventory_count", -2, Some(0));
        batch.delete("orders", "o1");
        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], WriteOp::Insert { .. }));
        assert!(matches!(batch.ops()[2], WriteOp::Delete { .. }));
    }
}
