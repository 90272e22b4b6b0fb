//! Order management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use sugarloaf_commerce::models::{Order, OrderFilter, OrderWithItems, UpdateStatusInput};
use sugarloaf_commerce::orders::UpdateStatusOptions;
use sugarloaf_core::OrderId;

use crate::error::AppError;
use crate::state::AppState;

/// List orders, newest first, optionally restricted to one status.
#[instrument(skip(state))]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders().list(&filter).await?))
}

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

/// Change an order's status, applying the side-effect policy.
///
/// Transitions outside the table are rejected with a conflict unless the
/// request sets `force` (deliberate admin correction).
#[instrument(skip(state, input), fields(status = %input.status, force = input.force))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<Order>, AppError> {
    let id = OrderId::new(id);
    let options = UpdateStatusOptions {
        admin_notes: input.admin_notes,
        tracking_number: input.tracking_number,
        tracking_url: input.tracking_url,
        force: input.force,
    };
    let order = state
        .status_engine()
        .update_status(&id, input.status, options)
        .await?;
    Ok(Json(order))
}

/// Hard-delete an order and its items.
///
/// Destructive and unaudited; exists for admin cleanup only.
#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = OrderId::new(id);
    if state.orders().delete(&id).await? {
        tracing::warn!(order_id = %id, "Order hard-deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("order {id}")))
    }
}
