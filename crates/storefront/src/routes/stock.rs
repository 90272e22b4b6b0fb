//! Advisory stock check.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sugarloaf_commerce::models::StockCheck;

use crate::error::AppError;
use crate::state::AppState;

/// Batched stock-check request.
#[derive(Debug, Deserialize)]
pub struct StockCheckRequest {
    pub checks: Vec<StockCheck>,
}

/// Availability keyed by `{product_id}-{color}-{size}` (bare product id for
/// aggregate products).
#[derive(Debug, Serialize)]
pub struct StockCheckResponse {
    pub availability: BTreeMap<String, i64>,
}

/// Report read-time availability for a batch of lines.
///
/// This is a read, not a reservation: checkout re-checks with a conditional
/// decrement, so callers should treat the answer as advisory.
#[instrument(skip(state, request), fields(checks = request.checks.len()))]
pub async fn check_stock(
    State(state): State<AppState>,
    Json(request): Json<StockCheckRequest>,
) -> Result<Json<StockCheckResponse>, AppError> {
    let availability = state.inventory().check_stock(&request.checks).await?;
    Ok(Json(StockCheckResponse { availability }))
}
