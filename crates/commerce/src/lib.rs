//! Sugarloaf Commerce - order, catalog, and inventory core.
//!
//! This crate holds everything between the HTTP surfaces and the document
//! store:
//!
//! - [`store`] - the `DocumentStore` trait plus its Postgres JSONB and
//!   in-memory implementations
//! - [`models`] - the document types (products, variants, orders, order
//!   items, inventory transactions) and their input structs
//! - [`db`] - repositories over an injected store handle
//! - [`orders`] - the order status engine and checkout
//! - [`inventory`] - inventory accounting: clamped adjustments, the
//!   append-only audit log, and the advisory stock check
//!
//! Every multi-document mutation goes through [`store::WriteBatch`], which
//! the store applies atomically. Checkout additionally uses conditional
//! decrements so two concurrent orders cannot consume the same last unit.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod error;
pub mod inventory;
pub mod models;
pub mod orders;
pub mod store;

pub use error::CommerceError;
