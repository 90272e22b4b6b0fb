//! Document models and their input structs.

pub mod order;
pub mod product;
pub mod transaction;
pub mod variant;

pub use order::{
    CreateOrderInput, Order, OrderFilter, OrderItem, OrderItemInput, OrderWithItems,
    UpdateStatusInput,
};
pub use product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
pub use transaction::{AdjustmentInput, InventoryTransaction};
pub use variant::{CreateVariantInput, StockCheck, UpdateVariantInput, Variant};
