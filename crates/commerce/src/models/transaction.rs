//! Inventory transaction (audit log) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sugarloaf_core::{AdminUserId, ProductId, TransactionId, TransactionType, VariantId};

/// An append-only audit record of a stock count change.
///
/// Written in the same atomic batch as the count mutation it describes, so
/// every mutation has exactly one matching record. Never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryTransaction {
    /// Unique transaction id.
    pub id: TransactionId,
    /// Product whose stock changed.
    pub product_id: ProductId,
    /// Variant whose stock changed, when on the per-variant path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    /// Signed delta as actually applied (after any clamp).
    pub quantity_change: i64,
    /// Count before the change.
    pub previous_quantity: i64,
    /// Count after the change.
    pub new_quantity: i64,
    /// Why the count changed.
    pub transaction_type: TransactionType,
    /// Id of the order/event that caused the change, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Kind of the reference (e.g. "order").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Admin who initiated the change, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<AdminUserId>,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
}

/// Input for a manual inventory adjustment.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentInput {
    /// Signed delta to apply. Results clamp at zero.
    pub quantity_change: i64,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub reference_id: Option<String>,
    #[serde(default)]
    pub reference_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<AdminUserId>,
}
