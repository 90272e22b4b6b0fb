//! Order status engine.
//!
//! The one place encoding the status policy for a cash-on-delivery shop:
//! "delivered" is the de facto moment of payment collection, so delivery and
//! cancellation force the payment status. The transition table rejects
//! nonsensical edges; `force` exists so the back office can deliberately
//! correct a mistake (e.g. un-deliver an order marked by accident).

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use sugarloaf_core::{OrderId, OrderStatus, PaymentStatus};

use crate::db::OrderRepository;
use crate::error::CommerceError;
use crate::models::Order;
use crate::store::DocumentStore;

/// Optional extras merged into the same status update.
#[derive(Debug, Clone, Default)]
pub struct UpdateStatusOptions {
    /// Free-form notes from the back office.
    pub admin_notes: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    /// Carrier tracking URL.
    pub tracking_url: Option<String>,
    /// Bypass the transition table.
    pub force: bool,
}

/// Applies status changes and their policy side effects as one
/// single-document update.
#[derive(Clone)]
pub struct OrderStatusEngine {
    orders: OrderRepository,
}

impl OrderStatusEngine {
    /// Create a new status engine over an injected store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: OrderRepository::new(store),
        }
    }

    /// The transition table. Terminal states have no outgoing edges.
    ///
    /// `processing -> delivered` is a legal shortcut: local COD couriers
    /// often hand an order over without a separate "sent for delivery"
    /// step being recorded.
    const fn transition_allowed(from: OrderStatus, to: OrderStatus) -> bool {
        matches!(
            (from, to),
            (
                OrderStatus::Pending,
                OrderStatus::Processing | OrderStatus::Cancelled
            ) | (
                OrderStatus::Processing,
                OrderStatus::Shipped | OrderStatus::Delivered | OrderStatus::Cancelled
            ) | (
                OrderStatus::Shipped,
                OrderStatus::Delivered | OrderStatus::Cancelled
            )
        )
    }

    /// Apply a status change with its side effects.
    ///
    /// Side-effect policy:
    /// - delivered: payment status forced to paid, `delivered_at` stamped
    ///   (first time only)
    /// - cancelled: payment status forced to cancelled
    /// - shipped: `shipped_at` stamped (first time only)
    /// - otherwise: payment status untouched
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` if the order doesn't exist, or
    /// `CommerceError::InvalidTransition` if the edge is not in the table
    /// and `force` is not set.
    pub async fn update_status(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
        options: UpdateStatusOptions,
    ) -> Result<Order, CommerceError> {
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| CommerceError::NotFound {
                entity: "order",
                id: id.to_string(),
            })?;

        if !Self::transition_allowed(order.status, new_status) && !options.force {
            return Err(CommerceError::InvalidTransition {
                from: order.status,
                to: new_status,
            });
        }

        let now = Utc::now();
        let mut patch = serde_json::Map::new();
        patch.insert("status".to_string(), json!(new_status));
        patch.insert("updated_at".to_string(), json!(now));

        match new_status {
            OrderStatus::Delivered => {
                patch.insert("payment_status".to_string(), json!(PaymentStatus::Paid));
                if order.delivered_at.is_none() {
                    patch.insert("delivered_at".to_string(), json!(now));
                }
            }
            OrderStatus::Cancelled => {
                patch.insert(
                    "payment_status".to_string(),
                    json!(PaymentStatus::Cancelled),
                );
            }
            OrderStatus::Shipped => {
                if order.shipped_at.is_none() {
                    patch.insert("shipped_at".to_string(), json!(now));
                }
            }
            OrderStatus::Pending | OrderStatus::Processing => {}
        }

        if let Some(notes) = options.admin_notes {
            patch.insert("admin_notes".to_string(), json!(notes));
        }
        if let Some(number) = options.tracking_number {
            patch.insert("tracking_number".to_string(), json!(number));
        }
        if let Some(url) = options.tracking_url {
            patch.insert("tracking_url".to_string(), json!(url));
        }

        self.orders.update_patch(id, Value::Object(patch)).await?;

        tracing::info!(order_id = %id, status = %new_status, forced = options.force, "Order status updated");

        self.orders
            .get(id)
            .await?
            .ok_or_else(|| CommerceError::NotFound {
                entity: "order",
                id: id.to_string(),
            })
    }
}
