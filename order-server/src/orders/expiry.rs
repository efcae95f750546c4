//! Pending-order expiry worker
//!
//! A submission that never produces a guard-satisfying confirmation
//! must end in FAILED, not hang in PENDING forever. This worker sweeps
//! on an interval and fails pending orders older than the configured
//! timeout through the normal transition path (so subscribers see the
//! event like any other).

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::service::OrderService;

/// Background worker failing stale pending orders
pub struct ExpiryWorker {
    orders: Arc<OrderService>,
    timeout_ms: u64,
    interval_ms: u64,
    shutdown: CancellationToken,
}

impl ExpiryWorker {
    pub fn new(
        orders: Arc<OrderService>,
        timeout_ms: u64,
        interval_ms: u64,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            orders,
            timeout_ms,
            interval_ms,
            shutdown,
        }
    }

    /// Run until the shutdown token fires
    pub async fn run(self) {
        let mut interval = tokio::time::interval(Duration::from_millis(self.interval_ms));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tracing::info!(
            timeout_ms = self.timeout_ms,
            interval_ms = self.interval_ms,
            "Expiry worker started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Expiry worker stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.orders.fail_stale_pending(self.timeout_ms) {
                        Ok(0) => {}
                        Ok(n) => tracing::info!(failed = n, "Expiry sweep failed stale orders"),
                        Err(e) => tracing::error!(error = %e, "Expiry sweep errored"),
                    }
                }
            }
        }
    }
}
