//! Checkout scenarios: stock consumption, oversell, and batch atomicity.

use rust_decimal::Decimal;
use sugarloaf_commerce::CommerceError;
use sugarloaf_commerce::models::{OrderFilter, OrderItemInput};
use sugarloaf_integration_tests::{TestContext, checkout_input};

// =============================================================================
// Stock consumption
// =============================================================================

/// Checkout consumes variant stock and snapshots catalog data per line.
#[tokio::test]
async fn test_variant_checkout_consumes_stock() {
    let ctx = TestContext::new();
    let shirt = ctx
        .seed_variant_product("Linen Shirt", &["red", "navy"], &["M", "L"])
        .await;
    let red_m = ctx.seed_variant(&shirt, "red", "M", 5).await;
    ctx.seed_variant(&shirt, "navy", "L", 5).await;

    let placed = ctx
        .checkout
        .create_order(checkout_input(vec![OrderItemInput {
            product_id: shirt.id.clone(),
            color: Some("red".to_string()),
            size: Some("M".to_string()),
            quantity: 2,
        }]))
        .await
        .expect("checkout");

    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].product_name, "Linen Shirt");
    assert_eq!(placed.items[0].unit_price, Decimal::new(3500, 2));
    assert_eq!(placed.items[0].total_price, Decimal::new(7000, 2));

    let remaining = ctx
        .variants
        .get(&red_m.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(remaining.inventory_count, 3);
}

/// Later catalog edits don't rewrite history: the line keeps its snapshot.
#[tokio::test]
async fn test_product_edits_do_not_change_past_orders() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;

    ctx.products
        .update(
            &product.id,
            sugarloaf_commerce::models::UpdateProductInput {
                name: Some("Canvas Tote v2".to_string()),
                price: Some(Decimal::new(2499, 2)),
                ..Default::default()
            },
        )
        .await
        .expect("edit product");

    let stored = ctx
        .orders
        .get_with_items(&placed.order.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.items[0].product_name, "Canvas Tote");
    assert_eq!(stored.items[0].unit_price, Decimal::new(1999, 2));
}

// =============================================================================
// Oversell
// =============================================================================

/// Two sequential checkouts race for the last unit: the first wins, the
/// second fails cleanly with nothing written.
#[tokio::test]
async fn test_second_checkout_for_the_last_unit_fails() {
    let ctx = TestContext::new();
    let shirt = ctx.seed_variant_product("Linen Shirt", &["red"], &["M"]).await;
    let variant = ctx.seed_variant(&shirt, "red", "M", 1).await;

    let line = || {
        checkout_input(vec![OrderItemInput {
            product_id: shirt.id.clone(),
            color: Some("red".to_string()),
            size: Some("M".to_string()),
            quantity: 1,
        }])
    };

    ctx.checkout.create_order(line()).await.expect("first order");
    let err = ctx.checkout.create_order(line()).await.unwrap_err();
    assert!(matches!(
        err,
        CommerceError::InsufficientStock {
            requested: 1,
            available: 0,
            ..
        }
    ));

    let remaining = ctx
        .variants
        .get(&variant.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(remaining.inventory_count, 0);

    let orders = ctx
        .orders
        .list(&OrderFilter::default())
        .await
        .expect("list");
    assert_eq!(orders.len(), 1);
}

/// A multi-line order where one line can't be satisfied writes nothing:
/// no order, no items, no decrements, no audit records.
#[tokio::test]
async fn test_failed_line_rolls_back_the_whole_order() {
    let ctx = TestContext::new();
    let shirt = ctx
        .seed_variant_product("Linen Shirt", &["red", "navy"], &["M"])
        .await;
    let red = ctx.seed_variant(&shirt, "red", "M", 10).await;
    ctx.seed_variant(&shirt, "navy", "M", 1).await;

    let err = ctx
        .checkout
        .create_order(checkout_input(vec![
            OrderItemInput {
                product_id: shirt.id.clone(),
                color: Some("red".to_string()),
                size: Some("M".to_string()),
                quantity: 2,
            },
            OrderItemInput {
                product_id: shirt.id.clone(),
                color: Some("navy".to_string()),
                size: Some("M".to_string()),
                quantity: 3,
            },
        ]))
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InsufficientStock { .. }));

    // The satisfiable red line wasn't applied either.
    let red_after = ctx.variants.get(&red.id).await.expect("get").expect("present");
    assert_eq!(red_after.inventory_count, 10);

    let orders = ctx
        .orders
        .list(&OrderFilter::default())
        .await
        .expect("list");
    assert!(orders.is_empty());

    let log = ctx
        .inventory
        .transactions_for_product(&shirt.id, None, None)
        .await
        .expect("log");
    assert!(log.is_empty());
}

// =============================================================================
// Totals
// =============================================================================

/// Shipping and discount flow into the stored totals; monetary fields stay
/// independently stored.
#[tokio::test]
async fn test_totals_include_fees_and_discounts() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;

    let mut input = checkout_input(vec![OrderItemInput {
        product_id: product.id.clone(),
        color: None,
        size: None,
        quantity: 2,
    }]);
    input.shipping_fee = Decimal::new(500, 2);
    input.discount = Decimal::new(300, 2);

    let placed = ctx.checkout.create_order(input).await.expect("checkout");
    assert_eq!(placed.order.subtotal, Decimal::new(3998, 2));
    assert_eq!(placed.order.shipping, Decimal::new(500, 2));
    assert_eq!(placed.order.discount, Decimal::new(300, 2));
    assert_eq!(placed.order.total, Decimal::new(4198, 2));
}
