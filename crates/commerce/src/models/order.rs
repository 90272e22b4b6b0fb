//! Order and order-item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sugarloaf_core::{
    Address, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, VariantId,
};

/// An order document.
///
/// Monetary fields are stored independently, as entered at checkout; nothing
/// recomputes them afterwards. `shipped_at` / `delivered_at` stay null until
/// the corresponding transition and are never cleared once set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order id.
    pub id: OrderId,
    /// Human-facing order number (`SL-<timestamp><random>`). Uniqueness is
    /// probabilistic; the store's insert conflict surfaces a collision.
    pub order_number: String,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Payment status, coupled to delivery for COD orders.
    pub payment_status: PaymentStatus,
    /// How the customer pays.
    pub payment_method: PaymentMethod,
    /// Sum of line totals at creation time.
    pub subtotal: Decimal,
    /// Tax charged.
    pub tax: Decimal,
    /// Shipping fee charged.
    pub shipping: Decimal,
    /// Discount applied.
    pub discount: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Shipping address snapshot.
    pub shipping_address: Address,
    /// Billing address snapshot.
    pub billing_address: Address,
    /// Free-form notes set by the back office.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    /// Carrier tracking number, set when shipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    /// Carrier tracking URL, set when shipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
    /// Set once on transition into shipped.
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    /// Set once on transition into delivered.
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A line item, belonging to exactly one order.
///
/// Name and unit price are snapshots taken at purchase time so later product
/// edits don't retroactively change historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique item id.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Variant consumed, when the product tracks variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Product name at purchase time.
    pub product_name: String,
    /// Unit price at purchase time.
    pub unit_price: Decimal,
    /// Units ordered.
    pub quantity: i64,
    /// `unit_price * quantity`, computed at creation.
    pub total_price: Decimal,
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One requested line at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity: i64,
}

/// Checkout submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    pub items: Vec<OrderItemInput>,
    pub shipping_address: Address,
    pub billing_address: Address,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Shipping fee quoted to the customer.
    #[serde(default)]
    pub shipping_fee: Decimal,
    /// Discount applied at checkout.
    #[serde(default)]
    pub discount: Decimal,
}

/// Status-change request for an order.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    /// Bypass the transition table (deliberate admin correction).
    #[serde(default)]
    pub force: bool,
}

/// Listing filter for orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
