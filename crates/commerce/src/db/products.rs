//! Product repository.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use sugarloaf_core::ProductId;

use super::{collections, from_doc, map_not_found, to_doc};
use crate::error::CommerceError;
use crate::models::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
use crate::store::{DocumentStore, Filter, Query, WriteBatch};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 100;

/// Repository for product documents.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProductRepository {
    /// Create a new product repository over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` for blank names or negative
    /// counts, `CommerceError::Store` if the write fails.
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, CommerceError> {
        if input.name.trim().is_empty() {
            return Err(CommerceError::validation("name", "must not be blank"));
        }
        if input.inventory_count < 0 {
            return Err(CommerceError::validation(
                "inventory_count",
                "must not be negative",
            ));
        }
        if input.price.is_sign_negative() {
            return Err(CommerceError::validation("price", "must not be negative"));
        }

        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            name: input.name,
            description: input.description,
            price: input.price,
            inventory_count: input.inventory_count,
            track_variants: input.track_variants,
            colors: input.colors,
            sizes: input.sizes,
            low_stock_threshold: input.low_stock_threshold,
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        let doc = to_doc(collections::PRODUCTS, &product)?;
        self.store
            .add(collections::PRODUCTS, product.id.as_str(), doc)
            .await?;
        Ok(product)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the read fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        self.store
            .get(collections::PRODUCTS, id.as_str())
            .await?
            .map(|doc| from_doc(collections::PRODUCTS, doc))
            .transpose()
    }

    /// List products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, CommerceError> {
        let mut query = Query::new()
            .order_desc("created_at")
            .limit(filter.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE))
            .offset(filter.offset.unwrap_or(0));
        if let Some(status) = filter.status {
            query = query.filter(Filter::eq("status", json!(status)));
        }
        self.store
            .query(collections::PRODUCTS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::PRODUCTS, doc))
            .collect()
    }

    /// Update a product. Absent input fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: &ProductId,
        input: UpdateProductInput,
    ) -> Result<Product, CommerceError> {
        let mut patch = serde_json::Map::new();
        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(CommerceError::validation("name", "must not be blank"));
            }
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(description) = input.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(price) = input.price {
            if price.is_sign_negative() {
                return Err(CommerceError::validation("price", "must not be negative"));
            }
            patch.insert("price".to_string(), json!(price));
        }
        if let Some(count) = input.inventory_count {
            if count < 0 {
                return Err(CommerceError::validation(
                    "inventory_count",
                    "must not be negative",
                ));
            }
            patch.insert("inventory_count".to_string(), json!(count));
        }
        if let Some(track) = input.track_variants {
            patch.insert("track_variants".to_string(), json!(track));
        }
        if let Some(colors) = input.colors {
            patch.insert("colors".to_string(), json!(colors));
        }
        if let Some(sizes) = input.sizes {
            patch.insert("sizes".to_string(), json!(sizes));
        }
        if let Some(threshold) = input.low_stock_threshold {
            patch.insert("low_stock_threshold".to_string(), json!(threshold));
        }
        if let Some(status) = input.status {
            patch.insert("status".to_string(), json!(status));
        }
        patch.insert("updated_at".to_string(), json!(Utc::now()));

        self.store
            .update(
                collections::PRODUCTS,
                id.as_str(),
                serde_json::Value::Object(patch),
            )
            .await
            .map_err(map_not_found("product", id.to_string()))?;

        self.get(id).await?.ok_or_else(|| CommerceError::NotFound {
            entity: "product",
            id: id.to_string(),
        })
    }

    /// Hard-delete a product and all of its variants in one batch.
    ///
    /// Returns `false` if the product didn't exist. This path is destructive
    /// admin cleanup; normal retirement goes through `status`.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the batch fails.
    pub async fn delete(&self, id: &ProductId) -> Result<bool, CommerceError> {
        if self.get(id).await?.is_none() {
            return Ok(false);
        }

        let variant_query =
            Query::new().filter(Filter::eq("product_id", json!(id)));
        let variants = self
            .store
            .query(collections::VARIANTS, &variant_query)
            .await?;

        let mut batch = WriteBatch::new();
        for doc in &variants {
            if let Some(variant_id) = doc.get("id").and_then(serde_json::Value::as_str) {
                batch.delete(collections::VARIANTS, variant_id);
            }
        }
        batch.delete(collections::PRODUCTS, id.as_str());
        self.store.apply(batch).await?;
        Ok(true)
    }

    /// Products on the aggregate path whose count is at or below their own
    /// low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn low_stock(&self) -> Result<Vec<Product>, CommerceError> {
        let query = Query::new().filter(Filter::eq("track_variants", json!(false)));
        let products: Vec<Product> = self
            .store
            .query(collections::PRODUCTS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::PRODUCTS, doc))
            .collect::<Result<_, _>>()?;
        Ok(products
            .into_iter()
            .filter(|product| product.inventory_count <= product.low_stock_threshold)
            .collect())
    }
}
