//! Order confirmation reads.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use sugarloaf_commerce::models::OrderWithItems;
use sugarloaf_core::OrderId;

use crate::error::AppError;
use crate::state::AppState;

/// Get an order with its line items.
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderWithItems>, AppError> {
    let id = OrderId::new(id);
    state
        .orders()
        .get_with_items(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
