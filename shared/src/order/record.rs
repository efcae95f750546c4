//! Persisted order record

use super::{Cents, Channel, LineItem, NormalizedOrder, OrderStatus};
use crate::util::{new_id, now_millis};
use serde::{Deserialize, Serialize};

/// The persisted order: one record owning its line items
///
/// Mutated only through state machine transitions. `version` is the
/// optimistic concurrency counter, incremented on every mutation;
/// writers must present the version they read or the write is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order id (assigned by the server)
    pub id: String,
    /// Owning restaurant id
    pub restaurant_id: String,
    /// Human-readable order number, e.g. `ORD20260806-1001`
    pub order_number: String,
    /// Originating channel
    pub channel: Channel,
    /// Current status
    pub status: OrderStatus,
    /// Table reference (dine-in)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Customer name (takeout/handoff)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Line items (cascade with the order)
    pub items: Vec<LineItem>,
    /// Subtotal in minor units
    pub subtotal: Cents,
    /// Tax in minor units
    pub tax: Cents,
    /// Tip in minor units
    pub tip: Cents,
    /// Total in minor units (== subtotal + tax + tip)
    pub total: Cents,
    /// Optimistic version counter, starts at 1
    pub version: u64,
    /// Cancellation/failure reason (mandatory for CANCELLED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Creation timestamp (UTC millis)
    pub created_at: i64,
    /// Last update timestamp (UTC millis)
    pub updated_at: i64,
}

impl OrderRecord {
    /// Build the initial PENDING record from a validated order
    pub fn from_normalized(order: NormalizedOrder, order_number: String) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            restaurant_id: order.restaurant_id,
            order_number,
            channel: order.channel,
            status: OrderStatus::Pending,
            table: order.table,
            customer_name: order.customer_name,
            items: order.items,
            subtotal: order.subtotal,
            tax: order.tax,
            tip: order.tip,
            total: order.total,
            version: 1,
            reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the order is in a terminal status
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether the order still appears on kitchen/expo boards
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}
