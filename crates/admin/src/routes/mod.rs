//! Admin route handlers.

pub mod inventory;
pub mod orders;
pub mod products;
pub mod variants;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Back-office API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/api/products/{id}/variants",
            get(variants::list_variants).post(variants::create_variant),
        )
        .route(
            "/api/variants/{id}",
            put(variants::update_variant).delete(variants::delete_variant),
        )
        // Inventory
        .route("/api/inventory/low-stock", get(inventory::low_stock))
        .route(
            "/api/products/{id}/inventory/adjust",
            post(inventory::adjust_product),
        )
        .route(
            "/api/variants/{id}/inventory/adjust",
            post(inventory::adjust_variant),
        )
        .route(
            "/api/products/{id}/transactions",
            get(inventory::list_transactions),
        )
        // Orders
        .route("/api/orders", get(orders::list_orders))
        .route(
            "/api/orders/{id}",
            get(orders::get_order).delete(orders::delete_order),
        )
        .route("/api/orders/{id}/status", put(orders::update_status))
}
