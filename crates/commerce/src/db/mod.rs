//! Repositories over the document store.
//!
//! Each repository holds an injected `Arc<dyn DocumentStore>` and owns the
//! (de)serialization between its model type and the stored JSON. Services
//! compose repositories and add the multi-document batches.

pub mod orders;
pub mod products;
pub mod transactions;
pub mod variants;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use transactions::TransactionRepository;
pub use variants::VariantRepository;

use crate::error::CommerceError;
use crate::store::StoreError;

/// Collection names used by the commerce core.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const VARIANTS: &str = "variants";
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";
    pub const INVENTORY_TRANSACTIONS: &str = "inventory_transactions";
}

/// Serialize a model into its stored document form.
pub(crate) fn to_doc<T: Serialize>(
    collection: &'static str,
    value: &T,
) -> Result<Value, CommerceError> {
    serde_json::to_value(value).map_err(|err| CommerceError::Corrupt {
        collection,
        message: err.to_string(),
    })
}

/// Deserialize a stored document into its model type.
pub(crate) fn from_doc<T: DeserializeOwned>(
    collection: &'static str,
    doc: Value,
) -> Result<T, CommerceError> {
    serde_json::from_value(doc).map_err(|err| CommerceError::Corrupt {
        collection,
        message: err.to_string(),
    })
}

/// Adapter for store-level `NotFound` into the domain error for `entity`.
pub(crate) fn map_not_found(
    entity: &'static str,
    id: String,
) -> impl FnOnce(StoreError) -> CommerceError {
    move |err| match err {
        StoreError::NotFound { .. } => CommerceError::NotFound { entity, id },
        other => CommerceError::Store(other),
    }
}
