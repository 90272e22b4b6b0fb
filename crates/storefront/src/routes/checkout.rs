//! Checkout handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use sugarloaf_commerce::models::{CreateOrderInput, OrderWithItems};

use crate::error::AppError;
use crate::state::AppState;

/// Create an order from a checkout submission.
///
/// Responds `201` with the order and its items; `409` when stock ran out
/// (nothing is written in that case).
#[instrument(skip(state, input), fields(lines = input.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<OrderWithItems>), AppError> {
    let created = state.checkout().create_order(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
