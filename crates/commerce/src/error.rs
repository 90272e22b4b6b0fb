//! Unified error type for the commerce core.

use sugarloaf_core::{AddressError, OrderStatus, ProductId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur in repositories and services.
///
/// Store-level failures pass through as [`CommerceError::Store`]; everything
/// else is a domain failure with enough structure for the HTTP layers to map
/// to a status code without parsing message strings.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Underlying document store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document did not deserialize into its model type.
    #[error("data corruption in {collection}: {message}")]
    Corrupt {
        collection: &'static str,
        message: String,
    },

    /// Requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A variant already exists for this (color, size) pair.
    #[error("variant already exists for color '{color}' size '{size}'")]
    DuplicateVariant { color: String, size: String },

    /// The color or size is not declared on the product.
    #[error("option '{option}' is not declared on product {product_id}")]
    UnknownOption {
        product_id: ProductId,
        option: String,
    },

    /// The requested status change is not in the transition table.
    #[error("invalid order status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Not enough stock to satisfy a checkout line.
    #[error("insufficient stock for {key}: requested {requested}, available {available}")]
    InsufficientStock {
        key: String,
        requested: i64,
        available: i64,
    },

    /// Checkout was submitted without any items.
    #[error("order has no items")]
    EmptyOrder,

    /// The product tracks per-variant stock; aggregate adjustment refused.
    #[error("inventory for product {0} is tracked per variant")]
    VariantTracked(ProductId),

    /// Boundary validation failure (addresses, quantities, option lists).
    #[error("validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
}

impl CommerceError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<AddressError> for CommerceError {
    fn from(err: AddressError) -> Self {
        Self::Validation {
            field: "address",
            message: err.to_string(),
        }
    }
}
