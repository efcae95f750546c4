//! Per-restaurant transition broadcast
//!
//! One tokio broadcast channel per restaurant, created lazily on first
//! use. Cross-tenant leakage is structurally impossible: a subscriber
//! holds a receiver for exactly one restaurant's channel, and events
//! are only ever sent to their own restaurant's sender.
//!
//! Delivery is fire-and-forget relative to persistence: the transition
//! is committed once the store succeeds, whether or not anyone is
//! listening. A lagged subscriber misses events and reconciles by
//! refetching order state over HTTP; there is no durable event log.

use dashmap::DashMap;
use shared::order::TransitionEvent;
use tokio::sync::broadcast;

/// Capacity of each restaurant's broadcast channel
const CHANNEL_CAPACITY: usize = 1024;

/// Per-restaurant transition event broadcaster
#[derive(Debug, Default)]
pub struct TransitionNotifier {
    channels: DashMap<String, broadcast::Sender<TransitionEvent>>,
}

impl TransitionNotifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    fn sender(&self, restaurant_id: &str) -> broadcast::Sender<TransitionEvent> {
        self.channels
            .entry(restaurant_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to one restaurant's transition events
    ///
    /// Callers must have resolved a [`crate::tenant::TenantContext`]
    /// for this restaurant before subscribing.
    pub fn subscribe(&self, restaurant_id: &str) -> broadcast::Receiver<TransitionEvent> {
        self.sender(restaurant_id).subscribe()
    }

    /// Publish a committed transition (fire-and-forget)
    pub fn publish(&self, event: TransitionEvent) {
        let sender = self.sender(&event.restaurant_id);
        if sender.send(event).is_err() {
            // No receivers right now; subscribers catch up by refetch
            tracing::debug!("Transition broadcast had no active receivers");
        }
    }

    /// Number of active subscribers for a restaurant
    pub fn subscriber_count(&self, restaurant_id: &str) -> usize {
        self.channels
            .get(restaurant_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}
