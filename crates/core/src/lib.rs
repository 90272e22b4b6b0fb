//! Sugarloaf Core - Shared types library.
//!
//! This crate provides common types used across all Sugarloaf components:
//! - `storefront` - Public-facing JSON API
//! - `admin` - Internal back-office JSON API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe document ids, status enums,
//!   and the typed address/payment records embedded in orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
