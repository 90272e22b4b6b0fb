//! Integration tests for Sugarloaf.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sugarloaf-integration-tests
//! ```
//!
//! Every suite runs against the in-memory document store, which has the
//! same semantics as the Postgres implementation (atomic batches, guarded
//! decrements), so no database is required.
//!
//! # Test Categories
//!
//! - `order_lifecycle` - status engine transitions and side effects
//! - `inventory_accounting` - clamp policy and audit completeness
//! - `checkout` - order creation, stock consumption, atomicity
//! - `storefront_api` / `admin_api` - router-level request tests

use std::net::IpAddr;
use std::sync::Arc;

use rust_decimal::Decimal;

use sugarloaf_commerce::db::{OrderRepository, ProductRepository, VariantRepository};
use sugarloaf_commerce::inventory::InventoryService;
use sugarloaf_commerce::models::{
    CreateOrderInput, CreateProductInput, CreateVariantInput, OrderItemInput, OrderWithItems,
    Product, Variant,
};
use sugarloaf_commerce::orders::{CheckoutService, OrderStatusEngine};
use sugarloaf_commerce::store::MemoryStore;
use sugarloaf_core::{Address, PaymentMethod, ProductStatus};

/// Shared fixture: every service wired over one in-memory store.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub products: ProductRepository,
    pub variants: VariantRepository,
    pub orders: OrderRepository,
    pub inventory: InventoryService,
    pub checkout: CheckoutService,
    pub status_engine: OrderStatusEngine,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            products: ProductRepository::new(store.clone()),
            variants: VariantRepository::new(store.clone()),
            orders: OrderRepository::new(store.clone()),
            inventory: InventoryService::new(store.clone()),
            checkout: CheckoutService::new(store.clone()),
            status_engine: OrderStatusEngine::new(store.clone()),
            store,
        }
    }

    /// Seed an aggregate-inventory product.
    pub async fn seed_product(&self, name: &str, price_cents: i64, count: i64) -> Product {
        self.products
            .create(CreateProductInput {
                name: name.to_string(),
                description: None,
                price: Decimal::new(price_cents, 2),
                inventory_count: count,
                track_variants: false,
                colors: vec![],
                sizes: vec![],
                low_stock_threshold: 5,
                status: ProductStatus::Active,
            })
            .await
            .expect("seed product")
    }

    /// Seed a variant-tracked product with declared option lists.
    pub async fn seed_variant_product(
        &self,
        name: &str,
        colors: &[&str],
        sizes: &[&str],
    ) -> Product {
        self.products
            .create(CreateProductInput {
                name: name.to_string(),
                description: None,
                price: Decimal::new(3500, 2),
                inventory_count: 0,
                track_variants: true,
                colors: colors.iter().map(ToString::to_string).collect(),
                sizes: sizes.iter().map(ToString::to_string).collect(),
                low_stock_threshold: 5,
                status: ProductStatus::Active,
            })
            .await
            .expect("seed variant product")
    }

    /// Seed one variant under a product.
    pub async fn seed_variant(
        &self,
        product: &Product,
        color: &str,
        size: &str,
        count: i64,
    ) -> Variant {
        self.variants
            .create(
                product,
                CreateVariantInput {
                    color: color.to_string(),
                    size: size.to_string(),
                    inventory_count: count,
                    low_stock_threshold: 2,
                    is_active: true,
                },
            )
            .await
            .expect("seed variant")
    }

    /// Place a simple one-line order for an aggregate product.
    pub async fn place_order(&self, product: &Product, quantity: i64) -> OrderWithItems {
        self.checkout
            .create_order(checkout_input(vec![OrderItemInput {
                product_id: product.id.clone(),
                color: None,
                size: None,
                quantity,
            }]))
            .await
            .expect("place order")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete, valid address for checkout fixtures.
#[must_use]
pub fn address() -> Address {
    Address {
        full_name: "Chinwe Eze".to_string(),
        line1: "21 Awolowo Way".to_string(),
        line2: None,
        city: "Ikeja".to_string(),
        state: Some("Lagos".to_string()),
        postal_code: "100271".to_string(),
        country: "NG".to_string(),
        phone: Some("+2347011112222".to_string()),
    }
}

/// A checkout submission with the given lines and zero fees.
#[must_use]
pub fn checkout_input(items: Vec<OrderItemInput>) -> CreateOrderInput {
    CreateOrderInput {
        items,
        shipping_address: address(),
        billing_address: address(),
        payment_method: PaymentMethod::CashOnDelivery,
        shipping_fee: Decimal::ZERO,
        discount: Decimal::ZERO,
    }
}

/// Fire one request at a router and return the status plus parsed JSON
/// body (`Value::Null` for empty bodies).
pub async fn request_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use tower::ServiceExt;

    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(json) => builder
            .body(axum::body::Body::from(json.to_string()))
            .expect("build request"),
        None => builder
            .body(axum::body::Body::empty())
            .expect("build request"),
    };

    let response = app.oneshot(request).await.expect("route request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse body")
    };
    (status, json)
}

/// The storefront router over an in-memory store, ready for `oneshot`.
#[must_use]
pub fn storefront_app(store: Arc<MemoryStore>) -> axum::Router {
    let config = sugarloaf_storefront::config::StorefrontConfig {
        database_url: "postgres://unused".to_string().into(),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = sugarloaf_storefront::state::AppState::new(config, store);
    sugarloaf_storefront::routes::routes().with_state(state)
}

/// The admin router over an in-memory store, ready for `oneshot`.
#[must_use]
pub fn admin_app(store: Arc<MemoryStore>) -> axum::Router {
    let config = sugarloaf_admin::config::AdminConfig {
        database_url: "postgres://unused".to_string().into(),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = sugarloaf_admin::state::AppState::new(config, store);
    sugarloaf_admin::routes::routes().with_state(state)
}
