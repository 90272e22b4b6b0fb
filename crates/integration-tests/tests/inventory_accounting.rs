//! Inventory accounting scenarios: the clamp policy and audit completeness.

use sugarloaf_commerce::models::AdjustmentInput;
use sugarloaf_core::TransactionType;
use sugarloaf_integration_tests::TestContext;

fn adjustment(change: i64, kind: TransactionType) -> AdjustmentInput {
    AdjustmentInput {
        quantity_change: change,
        transaction_type: kind,
        reference_id: None,
        reference_type: None,
        notes: Some("integration".to_string()),
        created_by: None,
    }
}

// =============================================================================
// Clamp policy
// =============================================================================

/// Selling 5 of 3 clamps to zero instead of going negative.
#[tokio::test]
async fn test_oversell_clamps_at_zero() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Wool Beanie", 1200, 3).await;

    let tx = ctx
        .inventory
        .adjust_product(&product.id, adjustment(-5, TransactionType::Sale))
        .await
        .expect("adjust");

    assert_eq!(tx.previous_quantity, 3);
    assert_eq!(tx.new_quantity, 0);
    assert_eq!(tx.quantity_change, -3);

    let stored = ctx
        .products
        .get(&product.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.inventory_count, 0);
}

/// The clamp holds across the whole delta range: `max(0, current + delta)`.
#[tokio::test]
async fn test_clamp_invariant_over_a_delta_sweep() {
    let ctx = TestContext::new();
    for (start, delta) in [(0, -1), (0, 3), (5, -5), (5, -9), (2, 7)] {
        let product = ctx
            .seed_product(&format!("Sweep {start}/{delta}"), 1000, start)
            .await;
        let tx = ctx
            .inventory
            .adjust_product(&product.id, adjustment(delta, TransactionType::Adjustment))
            .await
            .expect("adjust");
        assert_eq!(tx.new_quantity, (start + delta).max(0));
    }
}

// =============================================================================
// Audit completeness
// =============================================================================

/// Every stock mutation - aggregate adjustment, variant adjustment, and
/// checkout sale - appends exactly one matching audit record.
#[tokio::test]
async fn test_every_mutation_path_is_audited() {
    let ctx = TestContext::new();

    // Aggregate path
    let tote = ctx.seed_product("Canvas Tote", 1999, 10).await;
    ctx.inventory
        .adjust_product(&tote.id, adjustment(5, TransactionType::Restock))
        .await
        .expect("restock");
    ctx.place_order(&tote, 2).await;

    let tote_log = ctx
        .inventory
        .transactions_for_product(&tote.id, None, None)
        .await
        .expect("log");
    assert_eq!(tote_log.len(), 2);
    // Newest first: the sale, then the restock.
    assert_eq!(tote_log[0].transaction_type, TransactionType::Sale);
    assert_eq!(tote_log[0].quantity_change, -2);
    assert_eq!(tote_log[0].previous_quantity, 15);
    assert_eq!(tote_log[0].new_quantity, 13);
    assert_eq!(tote_log[1].transaction_type, TransactionType::Restock);
    assert_eq!(tote_log[1].new_quantity, 15);

    // The sale record references its order.
    assert_eq!(tote_log[0].reference_type.as_deref(), Some("order"));
    assert!(tote_log[0].reference_id.is_some());

    // Variant path
    let shirt = ctx
        .seed_variant_product("Linen Shirt", &["red"], &["M"])
        .await;
    let variant = ctx.seed_variant(&shirt, "red", "M", 4).await;
    ctx.inventory
        .adjust_variant(&variant.id, adjustment(-1, TransactionType::Adjustment))
        .await
        .expect("variant adjust");

    let shirt_log = ctx
        .inventory
        .transactions_for_product(&shirt.id, None, None)
        .await
        .expect("log");
    assert_eq!(shirt_log.len(), 1);
    assert_eq!(shirt_log[0].variant_id.as_ref(), Some(&variant.id));
    assert_eq!(shirt_log[0].new_quantity, 3);
}

/// The resulting count recorded in each audit record matches the stored
/// count after that mutation.
#[tokio::test]
async fn test_audit_counts_chain_to_the_stored_count() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Wool Beanie", 1200, 8).await;

    for (delta, kind) in [
        (-3, TransactionType::Sale),
        (2, TransactionType::Return),
        (-10, TransactionType::Sale),
    ] {
        ctx.inventory
            .adjust_product(&product.id, adjustment(delta, kind))
            .await
            .expect("adjust");
    }

    let log = ctx
        .inventory
        .transactions_for_product(&product.id, None, None)
        .await
        .expect("log");
    assert_eq!(log.len(), 3);

    // Oldest to newest: 8 -> 5 -> 7 -> 0 (clamped).
    let mut chained: Vec<_> = log.iter().rev().collect();
    assert_eq!(chained.remove(0).new_quantity, 5);
    assert_eq!(chained.remove(0).new_quantity, 7);
    assert_eq!(chained.remove(0).new_quantity, 0);

    let stored = ctx
        .products
        .get(&product.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored.inventory_count, 0);
}

// =============================================================================
// Read stability
// =============================================================================

/// Fetching the same product twice without intervening writes returns
/// identical data.
#[tokio::test]
async fn test_product_rereads_are_identical() {
    let ctx = TestContext::new();
    let product = ctx.seed_product("Wool Beanie", 1200, 8).await;

    let first = ctx
        .products
        .get(&product.id)
        .await
        .expect("get")
        .expect("present");
    let second = ctx
        .products
        .get(&product.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(
        serde_json::to_value(&first).expect("serialize"),
        serde_json::to_value(&second).expect("serialize")
    );
}
