//! Checkout: order creation with stock consumption.
//!
//! One atomic batch per checkout: the order document, its line items, a
//! conditional stock decrement per line, and a `sale` audit record per line.
//! A failed decrement guard fails the whole batch, so a lost oversell race
//! leaves no partial order behind.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;

use sugarloaf_core::{
    OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, TransactionId, TransactionType,
    VariantId,
};

use crate::db::{ProductRepository, VariantRepository, collections, to_doc};
use crate::error::CommerceError;
use crate::inventory::availability_key;
use crate::models::{
    CreateOrderInput, InventoryTransaction, Order, OrderItem, OrderWithItems, Product,
};
use crate::store::{DocumentStore, StoreError, WriteBatch};

/// Where a checkout line draws its stock from.
struct StockSource {
    collection: &'static str,
    doc_id: String,
    key: String,
    available: i64,
    variant_id: Option<VariantId>,
}

/// Creates orders from checkout submissions.
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn DocumentStore>,
    products: ProductRepository,
    variants: VariantRepository,
}

impl CheckoutService {
    /// Create a new checkout service over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            products: ProductRepository::new(store.clone()),
            variants: VariantRepository::new(store.clone()),
            store,
        }
    }

    /// Persist an order and its line items, consuming stock.
    ///
    /// Prices and names are snapshotted from the catalog at this moment;
    /// later product edits don't change the order. Stock is consumed with a
    /// conditional decrement per line, so two concurrent checkouts cannot
    /// both take the last unit.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::EmptyOrder`, `CommerceError::Validation` for
    /// bad addresses/quantities, `CommerceError::NotFound` for unknown
    /// products or variants, and `CommerceError::InsufficientStock` when a
    /// line cannot be satisfied (nothing is written in that case).
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
    ) -> Result<OrderWithItems, CommerceError> {
        if input.items.is_empty() {
            return Err(CommerceError::EmptyOrder);
        }
        input.shipping_address.validate()?;
        input.billing_address.validate()?;
        if input.shipping_fee.is_sign_negative() {
            return Err(CommerceError::validation(
                "shipping_fee",
                "must not be negative",
            ));
        }
        if input.discount.is_sign_negative() {
            return Err(CommerceError::validation("discount", "must not be negative"));
        }

        let now = Utc::now();
        let order_id = OrderId::generate();
        let mut batch = WriteBatch::new();
        let mut items = Vec::with_capacity(input.items.len());
        let mut sources: Vec<StockSource> = Vec::with_capacity(input.items.len());
        // Units already claimed per stock document, so repeated lines for
        // the same variant are checked cumulatively.
        let mut reserved: HashMap<String, i64> = HashMap::new();
        let mut subtotal = Decimal::ZERO;

        for line in &input.items {
            if line.quantity <= 0 {
                return Err(CommerceError::validation(
                    "quantity",
                    "must be greater than zero",
                ));
            }

            let product = self.require_sellable(&line.product_id).await?;
            let source = self
                .resolve_stock_source(&product, line.color.as_deref(), line.size.as_deref())
                .await?;

            let already = reserved.get(&source.doc_id).copied().unwrap_or(0);
            if source.available < already + line.quantity {
                return Err(CommerceError::InsufficientStock {
                    key: source.key,
                    requested: already + line.quantity,
                    available: source.available,
                });
            }
            reserved.insert(source.doc_id.clone(), already + line.quantity);

            let unit_price = product.price;
            let total_price = unit_price * Decimal::from(line.quantity);
            subtotal += total_price;

            let item = OrderItem {
                id: OrderItemId::generate(),
                order_id: order_id.clone(),
                product_id: product.id.clone(),
                variant_id: source.variant_id.clone(),
                color: line.color.clone(),
                size: line.size.clone(),
                product_name: product.name.clone(),
                unit_price,
                quantity: line.quantity,
                total_price,
            };
            batch.insert(
                collections::ORDER_ITEMS,
                item.id.as_str(),
                to_doc(collections::ORDER_ITEMS, &item)?,
            );

            // The guard re-checks at apply time; the read above only makes
            // the common failure fast and the error message precise.
            batch.increment(
                source.collection,
                source.doc_id.clone(),
                "inventory_count",
                -line.quantity,
                Some(0),
            );

            let previous = source.available - already;
            let audit = InventoryTransaction {
                id: TransactionId::generate(),
                product_id: product.id.clone(),
                variant_id: source.variant_id.clone(),
                quantity_change: -line.quantity,
                previous_quantity: previous,
                new_quantity: previous - line.quantity,
                transaction_type: TransactionType::Sale,
                reference_id: Some(order_id.to_string()),
                reference_type: Some("order".to_string()),
                notes: None,
                created_by: None,
                created_at: now,
            };
            batch.insert(
                collections::INVENTORY_TRANSACTIONS,
                audit.id.as_str(),
                to_doc(collections::INVENTORY_TRANSACTIONS, &audit)?,
            );

            items.push(item);
            sources.push(source);
        }

        let tax = Decimal::ZERO;
        let total = subtotal + tax + input.shipping_fee - input.discount;
        if total.is_sign_negative() {
            return Err(CommerceError::validation(
                "discount",
                "exceeds the order total",
            ));
        }

        let order = Order {
            id: order_id.clone(),
            order_number: generate_order_number(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: input.payment_method,
            subtotal,
            tax,
            shipping: input.shipping_fee,
            discount: input.discount,
            total,
            shipping_address: input.shipping_address,
            billing_address: input.billing_address,
            admin_notes: None,
            tracking_number: None,
            tracking_url: None,
            created_at: now,
            updated_at: now,
            shipped_at: None,
            delivered_at: None,
        };
        batch.insert(
            collections::ORDERS,
            order.id.as_str(),
            to_doc(collections::ORDERS, &order)?,
        );

        match self.store.apply(batch).await {
            Ok(()) => {}
            Err(StoreError::ConditionFailed { collection, id, .. }) => {
                return Err(self.lost_race(&sources, &reserved, &collection, &id).await);
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            lines = items.len(),
            "Order created"
        );

        Ok(OrderWithItems { order, items })
    }

    /// Fetch a product and confirm it can be sold.
    async fn require_sellable(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let product = self
            .products
            .get(id)
            .await?
            .ok_or_else(|| CommerceError::NotFound {
                entity: "product",
                id: id.to_string(),
            })?;
        if product.status != sugarloaf_core::ProductStatus::Active {
            return Err(CommerceError::validation(
                "product",
                format!("product {id} is not available"),
            ));
        }
        Ok(product)
    }

    /// Work out which document a line decrements and how much it holds.
    async fn resolve_stock_source(
        &self,
        product: &Product,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<StockSource, CommerceError> {
        if product.track_variants {
            let (Some(color), Some(size)) = (color, size) else {
                return Err(CommerceError::validation(
                    "variant",
                    format!("product {} requires a color and size", product.id),
                ));
            };
            let variant = self
                .variants
                .find(&product.id, color, size)
                .await?
                .ok_or_else(|| CommerceError::NotFound {
                    entity: "variant",
                    id: availability_key(&product.id, Some(color), Some(size)),
                })?;
            if !variant.is_active {
                return Err(CommerceError::validation(
                    "variant",
                    format!("variant {} is not available", variant.id),
                ));
            }
            Ok(StockSource {
                collection: collections::VARIANTS,
                doc_id: variant.id.to_string(),
                key: availability_key(&product.id, Some(color), Some(size)),
                available: variant.inventory_count,
                variant_id: Some(variant.id),
            })
        } else {
            Ok(StockSource {
                collection: collections::PRODUCTS,
                doc_id: product.id.to_string(),
                key: availability_key(&product.id, None, None),
                available: product.inventory_count,
                variant_id: None,
            })
        }
    }

    /// Translate a lost decrement race into `InsufficientStock`, re-reading
    /// the current count for the message.
    async fn lost_race(
        &self,
        sources: &[StockSource],
        reserved: &HashMap<String, i64>,
        collection: &str,
        doc_id: &str,
    ) -> CommerceError {
        let key = sources
            .iter()
            .find(|source| source.collection == collection && source.doc_id == doc_id)
            .map_or_else(|| doc_id.to_string(), |source| source.key.clone());
        let requested = reserved.get(doc_id).copied().unwrap_or(0);
        let available = match self.store.get(collection, doc_id).await {
            Ok(Some(doc)) => doc
                .get("inventory_count")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0),
            _ => 0,
        };
        CommerceError::InsufficientStock {
            key,
            requested,
            available,
        }
    }
}

/// Order numbers are the creation timestamp plus a random suffix.
/// Uniqueness is probabilistic; the order insert conflicts on the one-in-ten-
/// thousand collision within a millisecond instead of overwriting.
fn generate_order_number() -> String {
    let suffix: u16 = rand::rng().random_range(0..10_000);
    format!("SL-{}{suffix:04}", Utc::now().timestamp_millis())
}
