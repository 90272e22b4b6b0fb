//! Catalog read handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sugarloaf_commerce::models::{Product, ProductFilter, Variant};
use sugarloaf_core::{ProductId, ProductStatus};

use crate::error::AppError;
use crate::state::AppState;

/// Pagination params for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A product with its purchasable variants.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<Variant>,
}

/// List active products, newest first.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    let filter = ProductFilter {
        status: Some(ProductStatus::Active),
        limit: params.limit,
        offset: params.offset,
    };
    Ok(Json(state.products().list(&filter).await?))
}

/// Get one active product with its active variants.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, AppError> {
    let id = ProductId::new(id);
    let product = state
        .products()
        .get(&id)
        .await?
        .filter(|product| product.status == ProductStatus::Active)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let variants = if product.track_variants {
        state
            .variants()
            .list_for_product(&product.id)
            .await?
            .into_iter()
            .filter(|variant| variant.is_active)
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(ProductDetail { product, variants }))
}
