//! Variant repository.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use sugarloaf_core::{ProductId, VariantId};

use super::{collections, from_doc, map_not_found, to_doc};
use crate::error::CommerceError;
use crate::models::{CreateVariantInput, Product, UpdateVariantInput, Variant};
use crate::store::{DocumentStore, Filter, Query};

/// Repository for variant stock documents.
#[derive(Clone)]
pub struct VariantRepository {
    store: Arc<dyn DocumentStore>,
}

impl VariantRepository {
    /// Create a new variant repository over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a variant under a product.
    ///
    /// The (color, size) pair must be drawn from the product's declared
    /// option lists, and no variant may already exist for it.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::UnknownOption` for undeclared options,
    /// `CommerceError::DuplicateVariant` if the pair is taken.
    pub async fn create(
        &self,
        product: &Product,
        input: CreateVariantInput,
    ) -> Result<Variant, CommerceError> {
        if !product.colors.iter().any(|color| *color == input.color) {
            return Err(CommerceError::UnknownOption {
                product_id: product.id.clone(),
                option: input.color,
            });
        }
        if !product.sizes.iter().any(|size| *size == input.size) {
            return Err(CommerceError::UnknownOption {
                product_id: product.id.clone(),
                option: input.size,
            });
        }
        if input.inventory_count < 0 {
            return Err(CommerceError::validation(
                "inventory_count",
                "must not be negative",
            ));
        }
        if self
            .find(&product.id, &input.color, &input.size)
            .await?
            .is_some()
        {
            return Err(CommerceError::DuplicateVariant {
                color: input.color,
                size: input.size,
            });
        }

        let now = Utc::now();
        let variant = Variant {
            id: VariantId::generate(),
            product_id: product.id.clone(),
            color: input.color,
            size: input.size,
            inventory_count: input.inventory_count,
            low_stock_threshold: input.low_stock_threshold,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        let doc = to_doc(collections::VARIANTS, &variant)?;
        self.store
            .add(collections::VARIANTS, variant.id.as_str(), doc)
            .await?;
        Ok(variant)
    }

    /// Get a variant by id.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the read fails.
    pub async fn get(&self, id: &VariantId) -> Result<Option<Variant>, CommerceError> {
        self.store
            .get(collections::VARIANTS, id.as_str())
            .await?
            .map(|doc| from_doc(collections::VARIANTS, doc))
            .transpose()
    }

    /// Look up a variant by its (product, color, size) identity.
    ///
    /// Duplicate documents for the same pair shouldn't exist, but if legacy
    /// data contains one the first match wins.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn find(
        &self,
        product_id: &ProductId,
        color: &str,
        size: &str,
    ) -> Result<Option<Variant>, CommerceError> {
        let query = Query::new()
            .filter(Filter::eq("product_id", json!(product_id)))
            .filter(Filter::eq("color", color))
            .filter(Filter::eq("size", size))
            .limit(1);
        self.store
            .query(collections::VARIANTS, &query)
            .await?
            .into_iter()
            .next()
            .map(|doc| from_doc(collections::VARIANTS, doc))
            .transpose()
    }

    /// List all variants of a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Variant>, CommerceError> {
        let query = Query::new()
            .filter(Filter::eq("product_id", json!(product_id)))
            .order_asc("created_at");
        self.store
            .query(collections::VARIANTS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::VARIANTS, doc))
            .collect()
    }

    /// Update a variant. Absent input fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the variant doesn't exist.
    pub async fn update(
        &self,
        id: &VariantId,
        input: UpdateVariantInput,
    ) -> Result<Variant, CommerceError> {
        let mut patch = serde_json::Map::new();
        if let Some(count) = input.inventory_count {
            if count < 0 {
                return Err(CommerceError::validation(
                    "inventory_count",
                    "must not be negative",
                ));
            }
            patch.insert("inventory_count".to_string(), json!(count));
        }
        if let Some(threshold) = input.low_stock_threshold {
            patch.insert("low_stock_threshold".to_string(), json!(threshold));
        }
        if let Some(active) = input.is_active {
            patch.insert("is_active".to_string(), json!(active));
        }
        patch.insert("updated_at".to_string(), json!(Utc::now()));

        self.store
            .update(
                collections::VARIANTS,
                id.as_str(),
                serde_json::Value::Object(patch),
            )
            .await
            .map_err(map_not_found("variant", id.to_string()))?;

        self.get(id).await?.ok_or_else(|| CommerceError::NotFound {
            entity: "variant",
            id: id.to_string(),
        })
    }

    /// Delete a variant. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the delete fails.
    pub async fn delete(&self, id: &VariantId) -> Result<bool, CommerceError> {
        Ok(self.store.delete(collections::VARIANTS, id.as_str()).await?)
    }

    /// Active variants at or below their own low-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn low_stock(&self) -> Result<Vec<Variant>, CommerceError> {
        let query = Query::new().filter(Filter::eq("is_active", json!(true)));
        let variants: Vec<Variant> = self
            .store
            .query(collections::VARIANTS, &query)
            .await?
            .into_iter()
            .map(|doc| from_doc(collections::VARIANTS, doc))
            .collect::<Result<_, _>>()?;
        Ok(variants
            .into_iter()
            .filter(|variant| variant.inventory_count <= variant.low_stock_threshold)
            .collect())
    }
}
