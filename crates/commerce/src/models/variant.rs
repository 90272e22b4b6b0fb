//! Variant stock models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sugarloaf_core::{ProductId, VariantId};

use super::product::DEFAULT_LOW_STOCK_THRESHOLD;

/// A (product, color, size) stock record with its own count.
///
/// At most one variant exists per (color, size) pair of a product; creation
/// enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Unique variant id.
    pub id: VariantId,
    /// Owning product.
    pub product_id: ProductId,
    /// Color option, drawn from the product's declared colors.
    pub color: String,
    /// Size option, drawn from the product's declared sizes.
    pub size: String,
    /// Units in stock. Never negative.
    pub inventory_count: i64,
    /// Count at or below which the variant is flagged as low stock.
    pub low_stock_threshold: i64,
    /// Inactive variants are hidden from the storefront and skipped by
    /// checkout.
    pub is_active: bool,
    /// When the variant was created.
    pub created_at: DateTime<Utc>,
    /// When the variant was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a variant under a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVariantInput {
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub inventory_count: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for updating a variant. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateVariantInput {
    pub inventory_count: Option<i64>,
    pub low_stock_threshold: Option<i64>,
    pub is_active: Option<bool>,
}

/// One line of a stock-check request.
#[derive(Debug, Clone, Deserialize)]
pub struct StockCheck {
    pub product_id: ProductId,
    /// Required when the product tracks variants.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    pub requested_quantity: i64,
}

const fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

const fn default_true() -> bool {
    true
}
