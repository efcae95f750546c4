//! Transition events published to display clients

use super::{OrderRecord, OrderStatus};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// A committed status change, published after persistence succeeds
///
/// Delivery is at-least-once and fire-and-forget: a subscriber that
/// misses an event reconciles by refetching current order state, not by
/// replaying a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Order id
    pub order_id: String,
    /// Owning restaurant id
    pub restaurant_id: String,
    /// Status before the transition (`None` for creation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_status: Option<OrderStatus>,
    /// Status after the transition
    pub to_status: OrderStatus,
    /// Version after the transition (for client-side reconciliation)
    pub version: u64,
    /// Commit timestamp (UTC millis)
    pub timestamp: i64,
}

impl TransitionEvent {
    /// Event for a freshly created order
    pub fn created(record: &OrderRecord) -> Self {
        Self {
            order_id: record.id.clone(),
            restaurant_id: record.restaurant_id.clone(),
            from_status: None,
            to_status: record.status,
            version: record.version,
            timestamp: now_millis(),
        }
    }

    /// Event for a committed transition
    pub fn transitioned(record: &OrderRecord, from: OrderStatus) -> Self {
        Self {
            order_id: record.id.clone(),
            restaurant_id: record.restaurant_id.clone(),
            from_status: Some(from),
            to_status: record.status,
            version: record.version,
            timestamp: now_millis(),
        }
    }
}
