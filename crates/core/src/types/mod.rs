//! Core types for Sugarloaf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod status;

pub use address::{Address, AddressError, PaymentMethod};
pub use id::*;
pub use status::*;
