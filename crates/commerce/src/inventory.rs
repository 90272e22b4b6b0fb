//! Inventory accounting.
//!
//! Signed stock deltas with the clamp-at-zero policy, each paired with an
//! append-only audit record in the same atomic batch, plus the advisory
//! stock check used by the storefront before checkout.
//!
//! Clamp-at-zero means an over-decrement silently loses the excess instead
//! of failing; the audit record carries the delta as actually applied.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use sugarloaf_core::{ProductId, ProductStatus, TransactionId, VariantId};

use crate::db::{
    ProductRepository, TransactionRepository, VariantRepository, collections, to_doc,
};
use crate::error::CommerceError;
use crate::models::{AdjustmentInput, InventoryTransaction, StockCheck};
use crate::store::{DocumentStore, WriteBatch};

/// Key for one entry of a stock-check response.
///
/// Variant-tracked products key as `{product_id}-{color}-{size}`; aggregate
/// products key as the bare product id.
#[must_use]
pub fn availability_key(
    product_id: &ProductId,
    color: Option<&str>,
    size: Option<&str>,
) -> String {
    match (color, size) {
        (Some(color), Some(size)) => format!("{product_id}-{color}-{size}"),
        (Some(only), None) | (None, Some(only)) => format!("{product_id}-{only}"),
        (None, None) => product_id.to_string(),
    }
}

/// Applies stock deltas and reads availability.
#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn DocumentStore>,
    products: ProductRepository,
    variants: VariantRepository,
    transactions: TransactionRepository,
}

impl InventoryService {
    /// Create a new inventory service over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            products: ProductRepository::new(store.clone()),
            variants: VariantRepository::new(store.clone()),
            transactions: TransactionRepository::new(store.clone()),
            store,
        }
    }

    /// Apply a signed delta to a product's aggregate count.
    ///
    /// The new count is `max(0, current + delta)`. The count update and the
    /// audit record land in one atomic batch; the returned transaction
    /// carries the applied delta and both counts.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the product doesn't exist, or
    /// `CommerceError::VariantTracked` if its stock is accounted per
    /// variant.
    pub async fn adjust_product(
        &self,
        product_id: &ProductId,
        input: AdjustmentInput,
    ) -> Result<InventoryTransaction, CommerceError> {
        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or_else(|| CommerceError::NotFound {
                entity: "product",
                id: product_id.to_string(),
            })?;
        if product.track_variants {
            return Err(CommerceError::VariantTracked(product.id));
        }

        let previous = product.inventory_count;
        let new = (previous + input.quantity_change).max(0);
        let audit = build_transaction(product_id.clone(), None, previous, new, input);

        let mut batch = WriteBatch::new();
        batch.update(
            collections::PRODUCTS,
            product_id.as_str(),
            json!({ "inventory_count": new, "updated_at": Utc::now() }),
        );
        batch.insert(
            collections::INVENTORY_TRANSACTIONS,
            audit.id.as_str(),
            to_doc(collections::INVENTORY_TRANSACTIONS, &audit)?,
        );
        self.store.apply(batch).await?;

        tracing::info!(
            product_id = %product_id,
            change = audit.quantity_change,
            new_count = new,
            kind = %audit.transaction_type,
            "Inventory adjusted"
        );
        Ok(audit)
    }

    /// Apply a signed delta to a variant's count.
    ///
    /// Same clamp and audit semantics as [`InventoryService::adjust_product`];
    /// every variant mutation gets its audit record too.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the variant doesn't exist.
    pub async fn adjust_variant(
        &self,
        variant_id: &VariantId,
        input: AdjustmentInput,
    ) -> Result<InventoryTransaction, CommerceError> {
        let variant = self
            .variants
            .get(variant_id)
            .await?
            .ok_or_else(|| CommerceError::NotFound {
                entity: "variant",
                id: variant_id.to_string(),
            })?;

        let previous = variant.inventory_count;
        let new = (previous + input.quantity_change).max(0);
        let audit = build_transaction(
            variant.product_id.clone(),
            Some(variant.id.clone()),
            previous,
            new,
            input,
        );

        let mut batch = WriteBatch::new();
        batch.update(
            collections::VARIANTS,
            variant_id.as_str(),
            json!({ "inventory_count": new, "updated_at": Utc::now() }),
        );
        batch.insert(
            collections::INVENTORY_TRANSACTIONS,
            audit.id.as_str(),
            to_doc(collections::INVENTORY_TRANSACTIONS, &audit)?,
        );
        self.store.apply(batch).await?;

        tracing::info!(
            variant_id = %variant_id,
            change = audit.quantity_change,
            new_count = new,
            kind = %audit.transaction_type,
            "Variant inventory adjusted"
        );
        Ok(audit)
    }

    /// Advisory availability read for a batch of (product, color, size)
    /// tuples.
    ///
    /// Reports what was in stock at read time; nothing is reserved. Unknown
    /// products, unknown variants, inactive records, and variant-tracked
    /// products queried without options all report zero.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if a read fails.
    pub async fn check_stock(
        &self,
        checks: &[StockCheck],
    ) -> Result<BTreeMap<String, i64>, CommerceError> {
        let mut availability = BTreeMap::new();
        for check in checks {
            let key = availability_key(
                &check.product_id,
                check.color.as_deref(),
                check.size.as_deref(),
            );
            let available = self.available_for(check).await?;
            availability.insert(key, available);
        }
        Ok(availability)
    }

    async fn available_for(&self, check: &StockCheck) -> Result<i64, CommerceError> {
        let Some(product) = self.products.get(&check.product_id).await? else {
            return Ok(0);
        };
        if product.status != ProductStatus::Active {
            return Ok(0);
        }
        if product.track_variants {
            let (Some(color), Some(size)) = (check.color.as_deref(), check.size.as_deref())
            else {
                return Ok(0);
            };
            let variant = self.variants.find(&product.id, color, size).await?;
            Ok(variant
                .filter(|variant| variant.is_active)
                .map_or(0, |variant| variant.inventory_count))
        } else {
            Ok(product.inventory_count)
        }
    }

    /// A product's audit trail, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Store` if the query fails.
    pub async fn transactions_for_product(
        &self,
        product_id: &ProductId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<InventoryTransaction>, CommerceError> {
        self.transactions
            .list_for_product(product_id, limit, offset)
            .await
    }
}

fn build_transaction(
    product_id: ProductId,
    variant_id: Option<VariantId>,
    previous: i64,
    new: i64,
    input: AdjustmentInput,
) -> InventoryTransaction {
    InventoryTransaction {
        id: TransactionId::generate(),
        product_id,
        variant_id,
        // The applied delta, which differs from the requested one when the
        // clamp kicked in.
        quantity_change: new - previous,
        previous_quantity: previous,
        new_quantity: new,
        transaction_type: input.transaction_type,
        reference_id: input.reference_id,
        reference_type: input.reference_type,
        notes: input.notes,
        created_by: input.created_by,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProductInput, CreateVariantInput};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use sugarloaf_core::TransactionType;

    async fn service_with_product(count: i64) -> (InventoryService, ProductId) {
        let store = Arc::new(MemoryStore::new());
        let products = ProductRepository::new(store.clone());
        let product = products
            .create(CreateProductInput {
                name: "Wool Beanie".to_string(),
                description: None,
                price: Decimal::new(1200, 2),
                inventory_count: count,
                track_variants: false,
                colors: vec![],
                sizes: vec![],
                low_stock_threshold: 5,
                status: ProductStatus::Active,
            })
            .await
            .expect("seed product");
        (InventoryService::new(store), product.id)
    }

    fn adjustment(change: i64, kind: TransactionType) -> AdjustmentInput {
        AdjustmentInput {
            quantity_change: change,
            transaction_type: kind,
            reference_id: None,
            reference_type: None,
            notes: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_restock_raises_the_count() {
        let (service, product_id) = service_with_product(3).await;
        let tx = service
            .adjust_product(&product_id, adjustment(7, TransactionType::Restock))
            .await
            .expect("adjust");
        assert_eq!(tx.previous_quantity, 3);
        assert_eq!(tx.new_quantity, 10);
        assert_eq!(tx.quantity_change, 7);
    }

    #[tokio::test]
    async fn test_oversell_clamps_at_zero() {
        let (service, product_id) = service_with_product(3).await;
        let tx = service
            .adjust_product(&product_id, adjustment(-5, TransactionType::Sale))
            .await
            .expect("adjust");
        // Clamped: the count lands on 0, not -2, and the audit shows what
        // was actually applied.
        assert_eq!(tx.new_quantity, 0);
        assert_eq!(tx.quantity_change, -3);
    }

    #[tokio::test]
    async fn test_every_adjustment_appends_one_audit_record() {
        let (service, product_id) = service_with_product(5).await;
        service
            .adjust_product(&product_id, adjustment(-2, TransactionType::Sale))
            .await
            .expect("first");
        service
            .adjust_product(&product_id, adjustment(4, TransactionType::Return))
            .await
            .expect("second");

        let log = service
            .transactions_for_product(&product_id, None, None)
            .await
            .expect("log");
        assert_eq!(log.len(), 2);
        // Newest first; resulting counts chain: 5 -> 3 -> 7.
        assert_eq!(log[0].transaction_type, TransactionType::Return);
        assert_eq!(log[0].previous_quantity, 3);
        assert_eq!(log[0].new_quantity, 7);
        assert_eq!(log[1].new_quantity, 3);
    }

    #[tokio::test]
    async fn test_variant_tracked_product_refuses_aggregate_adjustment() {
        let store = Arc::new(MemoryStore::new());
        let products = ProductRepository::new(store.clone());
        let product = products
            .create(CreateProductInput {
                name: "Linen Shirt".to_string(),
                description: None,
                price: Decimal::new(3500, 2),
                inventory_count: 0,
                track_variants: true,
                colors: vec!["navy".to_string()],
                sizes: vec!["L".to_string()],
                low_stock_threshold: 2,
                status: ProductStatus::Active,
            })
            .await
            .expect("seed");
        let service = InventoryService::new(store);

        let err = service
            .adjust_product(&product.id, adjustment(5, TransactionType::Restock))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::VariantTracked(_)));
    }

    #[tokio::test]
    async fn test_variant_adjustments_are_audited_too() {
        let store = Arc::new(MemoryStore::new());
        let products = ProductRepository::new(store.clone());
        let variants = VariantRepository::new(store.clone());
        let product = products
            .create(CreateProductInput {
                name: "Linen Shirt".to_string(),
                description: None,
                price: Decimal::new(3500, 2),
                inventory_count: 0,
                track_variants: true,
                colors: vec!["navy".to_string()],
                sizes: vec!["L".to_string()],
                low_stock_threshold: 2,
                status: ProductStatus::Active,
            })
            .await
            .expect("seed");
        let variant = variants
            .create(
                &product,
                CreateVariantInput {
                    color: "navy".to_string(),
                    size: "L".to_string(),
                    inventory_count: 1,
                    low_stock_threshold: 2,
                    is_active: true,
                },
            )
            .await
            .expect("seed variant");
        let service = InventoryService::new(store);

        let tx = service
            .adjust_variant(&variant.id, adjustment(-4, TransactionType::Adjustment))
            .await
            .expect("adjust");
        assert_eq!(tx.variant_id.as_ref(), Some(&variant.id));
        assert_eq!(tx.new_quantity, 0);
        assert_eq!(tx.quantity_change, -1);

        let log = service
            .transactions_for_product(&product.id, None, None)
            .await
            .expect("log");
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn test_stock_check_reports_read_time_counts() {
        let store = Arc::new(MemoryStore::new());
        let products = ProductRepository::new(store.clone());
        let variants = VariantRepository::new(store.clone());
        let product = products
            .create(CreateProductInput {
                name: "Linen Shirt".to_string(),
                description: None,
                price: Decimal::new(3500, 2),
                inventory_count: 0,
                track_variants: true,
                colors: vec!["red".to_string()],
                sizes: vec!["M".to_string()],
                low_stock_threshold: 2,
                status: ProductStatus::Active,
            })
            .await
            .expect("seed");
        variants
            .create(
                &product,
                CreateVariantInput {
                    color: "red".to_string(),
                    size: "M".to_string(),
                    inventory_count: 2,
                    low_stock_threshold: 2,
                    is_active: true,
                },
            )
            .await
            .expect("seed variant");
        let service = InventoryService::new(store);

        let availability = service
            .check_stock(&[
                StockCheck {
                    product_id: product.id.clone(),
                    color: Some("red".to_string()),
                    size: Some("M".to_string()),
                    requested_quantity: 3,
                },
                StockCheck {
                    product_id: ProductId::new("missing"),
                    color: None,
                    size: None,
                    requested_quantity: 1,
                },
            ])
            .await
            .expect("check");

        let key = format!("{}-red-M", product.id);
        // Requested 3, but only 2 on hand: the caller sees 2 and treats the
        // line as insufficient.
        assert_eq!(availability.get(&key), Some(&2));
        assert_eq!(availability.get("missing"), Some(&0));
    }
}
