//! Router-level tests for the storefront API.

use axum::http::StatusCode;
use serde_json::json;
use sugarloaf_integration_tests::{TestContext, request_json, storefront_app};

// =============================================================================
// Stock check
// =============================================================================

/// The stock-check endpoint returns the availability map keyed by
/// `{product_id}-{color}-{size}`.
#[tokio::test]
async fn test_stock_check_returns_keyed_availability() {
    let ctx = TestContext::new();
    let shirt = ctx.seed_variant_product("Linen Shirt", &["red"], &["M"]).await;
    ctx.seed_variant(&shirt, "red", "M", 2).await;
    let app = storefront_app(ctx.store.clone());

    let (status, body) = request_json(
        app,
        "POST",
        "/api/stock-check",
        Some(json!({
            "checks": [
                { "product_id": shirt.id, "color": "red", "size": "M", "requested_quantity": 3 },
                { "product_id": "ghost", "requested_quantity": 1 }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let key = format!("{}-red-M", shirt.id);
    assert_eq!(body["availability"][&key], json!(2));
    assert_eq!(body["availability"]["ghost"], json!(0));
}

// =============================================================================
// Checkout
// =============================================================================

/// A valid checkout responds 201 with the order and items.
#[tokio::test]
async fn test_checkout_returns_created_order() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let app = storefront_app(ctx.store.clone());

    let (status, body) = request_json(
        app,
        "POST",
        "/api/checkout",
        Some(json!({
            "items": [ { "product_id": product.id, "quantity": 2 } ],
            "shipping_address": sugarloaf_integration_tests::address(),
            "billing_address": sugarloaf_integration_tests::address(),
            "payment_method": "cod"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], json!("pending"));
    assert_eq!(body["payment_status"], json!("pending"));
    assert_eq!(body["items"][0]["quantity"], json!(2));
    assert_eq!(body["items"][0]["product_name"], json!("Canvas Tote"));
    assert!(
        body["order_number"]
            .as_str()
            .expect("order number")
            .starts_with("SL-")
    );
}

/// Oversell at checkout responds 409 and writes nothing.
#[tokio::test]
async fn test_checkout_oversell_conflicts() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 1).await;
    let app = storefront_app(ctx.store.clone());

    let (status, body) = request_json(
        app,
        "POST",
        "/api/checkout",
        Some(json!({
            "items": [ { "product_id": product.id, "quantity": 2 } ],
            "shipping_address": sugarloaf_integration_tests::address(),
            "billing_address": sugarloaf_integration_tests::address()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("insufficient stock"));

    let remaining = ctx
        .products
        .get(&product.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(remaining.inventory_count, 1);
}

/// A bad address is a 400 with the validation message.
#[tokio::test]
async fn test_checkout_rejects_incomplete_address() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 5).await;
    let app = storefront_app(ctx.store.clone());

    let mut bad_address = serde_json::to_value(sugarloaf_integration_tests::address())
        .expect("serialize address");
    bad_address["city"] = json!("");

    let (status, body) = request_json(
        app,
        "POST",
        "/api/checkout",
        Some(json!({
            "items": [ { "product_id": product.id, "quantity": 1 } ],
            "shipping_address": bad_address,
            "billing_address": sugarloaf_integration_tests::address()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .expect("error message")
            .contains("address")
    );
}

// =============================================================================
// Catalog and order reads
// =============================================================================

/// The public catalog lists active products only.
#[tokio::test]
async fn test_catalog_hides_inactive_products() {
    let ctx = TestContext::new();
    ctx.seed_product("Canvas Tote", 1999, 10).await;
    let retired = ctx.seed_product("Old Tote", 1500, 0).await;
    ctx.products
        .update(
            &retired.id,
            sugarloaf_commerce::models::UpdateProductInput {
                status: Some(sugarloaf_core::ProductStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .expect("retire");
    let app = storefront_app(ctx.store.clone());

    let (status, body) = request_json(app.clone(), "GET", "/api/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|product| product["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Canvas Tote"]);

    let (status, _) =
        request_json(app, "GET", &format!("/api/products/{}", retired.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Order confirmation returns the order with its items; unknown ids are 404.
#[tokio::test]
async fn test_order_confirmation_read() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;
    let app = storefront_app(ctx.store.clone());

    let (status, body) = request_json(
        app.clone(),
        "GET",
        &format!("/api/orders/{}", placed.order.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(placed.order.id));
    assert_eq!(body["items"].as_array().expect("items").len(), 1);

    let (status, _) = request_json(app, "GET", "/api/orders/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
