//! Inventory transaction repository (read side of the audit log).
//!
//! Records are only ever written through the batches built by
//! `inventory::InventoryService` and checkout, so this repository is
//! read-only by design.

use std::sync::Arc;

use serde_json::json;

use sugarloaf_core::ProductId;

use super::{collections, from_doc};
use crate::error::CommerceError;
use crate::models::InventoryTransaction;
use crate::store::{DocumentStore, Filter, Query};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Repository for the append-only inventory audit log.
#[derive(Clone)]
pub struct TransactionRepository {
    store: Arc<dyn DocumentStore>,
}

impl TransactionRepository {
    /// Create a new transaction repository over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List a product's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: &ProductId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<InventoryTransaction>, CommerceError> {
        let query = Query::new()
            .filter(Filter::eq("product_id", json!(product_id)))
            .order_desc("created_at")
            .limit(limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE))
            .offset(offset.unwrap_or(0));
        self.store
            .query(collections::INVENTORY_TRANSACTIONS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::INVENTORY_TRANSACTIONS, doc))
            .collect()
    }
}
