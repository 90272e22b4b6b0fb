//! Typed address and payment records embedded in orders.
//!
//! Orders snapshot the shipping and billing address at checkout time, so
//! these are plain data carriers. Validation happens once at the boundary
//! before persistence; stored snapshots are trusted on read.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A postal address snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient full name.
    pub full_name: String,
    /// Street address, first line.
    pub line1: String,
    /// Street address, second line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// City or locality.
    pub city: String,
    /// State, province, or region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// ISO country name or code.
    pub country: String,
    /// Contact phone number. Required for delivery coordination on COD
    /// shipments, optional on billing addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Validation failure for an address record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// A required field was empty or missing.
    #[error("missing required address field: {0}")]
    MissingField(&'static str),
}

impl Address {
    /// Validate that all required fields are present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first missing field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let required = [
            ("full_name", &self.full_name),
            ("line1", &self.line1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Supported payment methods.
///
/// Cash on delivery is the only method today; the delivered => paid coupling
/// in the order status engine depends on this staying true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    #[serde(alias = "cod")]
    CashOnDelivery,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CashOnDelivery => write!(f, "cash_on_delivery"),
        }
    }
}
