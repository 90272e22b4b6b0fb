//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sugarloaf_core::{ProductId, ProductStatus};

/// Default low-stock threshold for new products and variants.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// A catalog product.
///
/// When `track_variants` is true, `inventory_count` is not the source of
/// truth for availability - the variant records are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Aggregate stock count; meaningful only when `track_variants` is false.
    pub inventory_count: i64,
    /// Whether stock is accounted per (color, size) variant.
    pub track_variants: bool,
    /// Declared color options for variant creation.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Declared size options for variant creation.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Count at or below which the product is flagged as low stock.
    pub low_stock_threshold: i64,
    /// Catalog status.
    pub status: ProductStatus,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Initial aggregate stock. Ignored for availability once variants are
    /// tracked.
    #[serde(default)]
    pub inventory_count: i64,
    #[serde(default)]
    pub track_variants: bool,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Input for updating a product. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub inventory_count: Option<i64>,
    pub track_variants: Option<bool>,
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub low_stock_threshold: Option<i64>,
    pub status: Option<ProductStatus>,
}

/// Listing filter for products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Restrict to one catalog status.
    pub status: Option<ProductStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}
