//! Order repository.
//!
//! Orders are created by checkout (see `orders::checkout`), which owns the
//! multi-document batch; this repository covers the read side, the status
//! engine's single-document patches, and the destructive admin delete.

use std::sync::Arc;

use serde_json::{Value, json};

use sugarloaf_core::OrderId;

use super::{collections, from_doc, map_not_found};
use crate::error::CommerceError;
use crate::models::{Order, OrderFilter, OrderItem, OrderWithItems};
use crate::store::{DocumentStore, Filter, Query, WriteBatch};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

/// Repository for order and order-item documents.
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn DocumentStore>,
}

impl OrderRepository {
    /// Create a new order repository over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the read fails.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, CommerceError> {
        self.store
            .get(collections::ORDERS, id.as_str())
            .await?
            .map(|doc| from_doc(collections::ORDERS, doc))
            .transpose()
    }

    /// Get an order together with its line items.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if a read fails.
    pub async fn get_with_items(
        &self,
        id: &OrderId,
    ) -> Result<Option<OrderWithItems>, CommerceError> {
        let Some(order) = self.get(id).await? else {
            return Ok(None);
        };
        let items = self.items_for_order(id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// Line items belonging to an order.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn items_for_order(&self, id: &OrderId) -> Result<Vec<OrderItem>, CommerceError> {
        let query = Query::new().filter(Filter::eq("order_id", json!(id)));
        self.store
            .query(collections::ORDER_ITEMS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::ORDER_ITEMS, doc))
            .collect()
    }

    /// List orders, newest first, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, CommerceError> {
        let mut query = Query::new()
            .order_desc("created_at")
            .limit(filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE))
            .offset(filter.offset.unwrap_or(0));
        if let Some(status) = filter.status {
            query = query.filter(Filter::eq("status", json!(status)));
        }
        self.store
            .query(collections::ORDERS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::ORDERS, doc))
            .collect()
    }

    /// Merge a patch into an order document (single-document update).
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the order doesn't exist.
    pub async fn update_patch(&self, id: &OrderId, patch: Value) -> Result<(), CommerceError> {
        self.store
            .update(collections::ORDERS, id.as_str(), patch)
            .await
            .map_err(map_not_found("order", id.to_string()))
    }

    /// Hard-delete an order and its items in one batch.
    ///
    /// Destructive and unaudited admin cleanup; orders are never deleted in
    /// normal operation. Returns `false` if the order didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the batch fails.
    pub async fn delete(&self, id: &OrderId) -> Result<bool, CommerceError> {
        if self.get(id).await?.is_none() {
            return Ok(false);
        }
        let items = self.items_for_order(id).await?;
        let mut batch = WriteBatch::new();
        for item in &items {
            batch.delete(collections::ORDER_ITEMS, item.id.as_str());
        }
        batch.delete(collections::ORDERS, id.as_str());
        self.store.apply(batch).await?;
        Ok(true)
    }
}
