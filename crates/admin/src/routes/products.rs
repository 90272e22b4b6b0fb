//! Product management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use sugarloaf_commerce::models::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
use sugarloaf_core::ProductId;

use crate::error::AppError;
use crate::state::AppState;

/// Create a product.
#[instrument(skip(state, input), fields(name = %input.name))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products().create(input).await?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// List products, newest first, optionally filtered by status.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products().list(&filter).await?))
}

/// Get one product, any status.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    state
        .products()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Update a product. Absent fields are left untouched.
#[instrument(skip(state, input))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, AppError> {
    let id = ProductId::new(id);
    let product = state.products().update(&id, input).await?;
    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(product))
}

/// Hard-delete a product and its variants.
///
/// Destructive admin cleanup; prefer flipping `status` to retire a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = ProductId::new(id);
    if state.products().delete(&id).await? {
        tracing::info!(product_id = %id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}
