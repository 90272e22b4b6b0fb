//! Status enums for products, orders, payments, and inventory transactions.

use serde::{Deserialize, Serialize};

/// Product catalog status.
///
/// `out_of_stock` is a display status; availability itself is derived from
/// the aggregate count or the variant records, depending on `track_variants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

/// Order lifecycle status.
///
/// `shipped` is labelled "sent for delivery" in the back office; the wire
/// format accepts `sent_for_delivery` as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    #[serde(alias = "sent_for_delivery")]
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status admits no further transitions (without a forced
    /// override).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
    Cancelled,
}

/// Why an inventory count changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// New stock received.
    Restock,
    /// Manual correction by an admin.
    Adjustment,
    /// Customer return restocked.
    Return,
    /// Stock consumed by an order.
    Sale,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" | "sent_for_delivery" | "sent for delivery" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Failed => write!(f, "failed"),
            Self::Refunded => write!(f, "refunded"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Restock => write!(f, "restock"),
            Self::Adjustment => write!(f, "adjustment"),
            Self::Return => write!(f, "return"),
            Self::Sale => write!(f, "sale"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restock" => Ok(Self::Restock),
            "adjustment" => Ok(Self::Adjustment),
            "return" => Ok(Self::Return),
            "sale" => Ok(Self::Sale),
            _ => Err(format!("invalid transaction type: {s}")),
        }
    }
}
