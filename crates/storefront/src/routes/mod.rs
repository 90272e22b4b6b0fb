//! Storefront route handlers.

pub mod checkout;
pub mod orders;
pub mod products;
pub mod stock;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Public API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/stock-check", post(stock::check_stock))
        .route("/api/checkout", post(checkout::create_order))
        .route("/api/orders/{id}", get(orders::get_order))
}
