//! Order lifecycle scenarios: status transitions and their side effects.

use sugarloaf_commerce::CommerceError;
use sugarloaf_commerce::orders::UpdateStatusOptions;
use sugarloaf_core::{OrderStatus, PaymentStatus};
use sugarloaf_integration_tests::TestContext;

// =============================================================================
// Delivery
// =============================================================================

/// A processing COD order marked delivered is complete: status, payment, and
/// delivery timestamp all land in one update.
#[tokio::test]
async fn test_delivery_completes_an_order() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;

    ctx.status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Processing,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("process");

    let delivered = ctx
        .status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Delivered,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("deliver");

    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.payment_status, PaymentStatus::Paid);
    assert!(delivered.delivered_at.is_some());
}

/// The full path pending -> processing -> shipped -> delivered stamps both
/// timestamps, each exactly once.
#[tokio::test]
async fn test_full_path_stamps_both_timestamps() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;

    for status in [OrderStatus::Processing, OrderStatus::Shipped] {
        ctx.status_engine
            .update_status(&placed.order.id, status, UpdateStatusOptions::default())
            .await
            .expect("advance");
    }
    let shipped = ctx
        .orders
        .get(&placed.order.id)
        .await
        .expect("get")
        .expect("present");
    let shipped_at = shipped.shipped_at.expect("shipped_at stamped");
    assert!(shipped.delivered_at.is_none());

    let delivered = ctx
        .status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Delivered,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("deliver");

    // The shipped stamp survives the later transition untouched.
    assert_eq!(delivered.shipped_at, Some(shipped_at));
    assert!(delivered.delivered_at.is_some());
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cancelling after partial processing cancels the payment and never touches
/// the delivery timestamp.
#[tokio::test]
async fn test_cancellation_after_partial_processing() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;

    ctx.status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Processing,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("process");

    let cancelled = ctx
        .status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Cancelled,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("cancel");

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.payment_status, PaymentStatus::Cancelled);
    assert!(cancelled.delivered_at.is_none());
}

// =============================================================================
// Transition guard
// =============================================================================

/// Edges outside the table are rejected; the order is left untouched.
#[tokio::test]
async fn test_delivered_to_pending_is_rejected() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;

    ctx.status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Processing,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("process");
    ctx.status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Delivered,
            UpdateStatusOptions::default(),
        )
        .await
        .expect("deliver");

    let err = ctx
        .status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Pending,
            UpdateStatusOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::InvalidTransition { .. }));

    let order = ctx
        .orders
        .get(&placed.order.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
}

/// `force` is the deliberate escape hatch for admin correction.
#[tokio::test]
async fn test_forced_correction_bypasses_the_guard() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 1).await;

    ctx.status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Delivered,
            UpdateStatusOptions {
                force: true,
                ..UpdateStatusOptions::default()
            },
        )
        .await
        .expect("forced delivery");

    let corrected = ctx
        .status_engine
        .update_status(
            &placed.order.id,
            OrderStatus::Processing,
            UpdateStatusOptions {
                force: true,
                ..UpdateStatusOptions::default()
            },
        )
        .await
        .expect("forced correction");
    assert_eq!(corrected.status, OrderStatus::Processing);
    // The original delivery stamp is history, not state to be cleared.
    assert!(corrected.delivered_at.is_some());
}

// =============================================================================
// Read stability
// =============================================================================

/// Fetching the same order twice without intervening writes returns
/// identical data.
#[tokio::test]
async fn test_rereads_are_identical() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Canvas Tote", 1999, 10).await;
    let placed = ctx.place_order(&product, 2).await;

    let first = ctx
        .orders
        .get_with_items(&placed.order.id)
        .await
        .expect("get")
        .expect("present");
    let second = ctx
        .orders
        .get_with_items(&placed.order.id)
        .await
        .expect("get")
        .expect("present");

    assert_eq!(
        serde_json::to_value(&first).expect("serialize"),
        serde_json::to_value(&second).expect("serialize")
    );
}
