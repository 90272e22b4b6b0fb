//! Sugarloaf Storefront library.
//!
//! This crate provides the public storefront API as a library, allowing it
//! to be tested and reused. The binary in `main.rs` wires it to a Postgres
//! store; the integration tests run the same routers over the in-memory
//! store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
