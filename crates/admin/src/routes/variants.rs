//! Variant management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use sugarloaf_commerce::models::{CreateVariantInput, UpdateVariantInput, Variant};
use sugarloaf_core::{ProductId, VariantId};

use crate::error::AppError;
use crate::state::AppState;

/// Create a variant under a product.
///
/// The (color, size) pair must come from the product's declared option
/// lists; duplicates are rejected with a conflict.
#[instrument(skip(state, input), fields(color = %input.color, size = %input.size))]
pub async fn create_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateVariantInput>,
) -> Result<(StatusCode, Json<Variant>), AppError> {
    let product_id = ProductId::new(id);
    let product = state
        .products()
        .get(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    let variant = state.variants().create(&product, input).await?;
    tracing::info!(variant_id = %variant.id, product_id = %product_id, "Variant created");
    Ok((StatusCode::CREATED, Json(variant)))
}

/// List all variants of a product.
#[instrument(skip(state))]
pub async fn list_variants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Variant>>, AppError> {
    let product_id = ProductId::new(id);
    Ok(Json(state.variants().list_for_product(&product_id).await?))
}

/// Update a variant. Absent fields are left untouched.
#[instrument(skip(state, input))]
pub async fn update_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateVariantInput>,
) -> Result<Json<Variant>, AppError> {
    let id = VariantId::new(id);
    let variant = state.variants().update(&id, input).await?;
    tracing::info!(variant_id = %id, "Variant updated");
    Ok(Json(variant))
}

/// Delete a variant.
#[instrument(skip(state))]
pub async fn delete_variant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = VariantId::new(id);
    if state.variants().delete(&id).await? {
        tracing::info!(variant_id = %id, "Variant deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("variant {id}")))
    }
}
