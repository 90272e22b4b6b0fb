//! Inventory accounting handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sugarloaf_commerce::models::{AdjustmentInput, InventoryTransaction, Product, Variant};
use sugarloaf_core::{ProductId, VariantId};

use crate::error::AppError;
use crate::state::AppState;

/// Records at or below their low-stock thresholds, both accounting paths.
#[derive(Debug, Serialize)]
pub struct LowStockReport {
    pub products: Vec<Product>,
    pub variants: Vec<Variant>,
}

/// Pagination params for the audit log listing.
#[derive(Debug, Deserialize)]
pub struct TransactionParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Apply a signed delta to a product's aggregate count.
///
/// The result clamps at zero; the response is the audit record, which
/// carries the applied delta and both counts.
#[instrument(skip(state, input), fields(change = input.quantity_change))]
pub async fn adjust_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdjustmentInput>,
) -> Result<Json<InventoryTransaction>, AppError> {
    let id = ProductId::new(id);
    Ok(Json(state.inventory().adjust_product(&id, input).await?))
}

/// Apply a signed delta to a variant's count.
#[instrument(skip(state, input), fields(change = input.quantity_change))]
pub async fn adjust_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdjustmentInput>,
) -> Result<Json<InventoryTransaction>, AppError> {
    let id = VariantId::new(id);
    Ok(Json(state.inventory().adjust_variant(&id, input).await?))
}

/// A product's audit trail, newest first.
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<TransactionParams>,
) -> Result<Json<Vec<InventoryTransaction>>, AppError> {
    let id = ProductId::new(id);
    Ok(Json(
        state
            .inventory()
            .transactions_for_product(&id, params.limit, params.offset)
            .await?,
    ))
}

/// Everything at or below its low-stock threshold.
#[instrument(skip(state))]
pub async fn low_stock(State(state): State<AppState>) -> Result<Json<LowStockReport>, AppError> {
    let products = state.products().low_stock().await?;
    let variants = state.variants().low_stock().await?;
    Ok(Json(LowStockReport { products, variants }))
}
