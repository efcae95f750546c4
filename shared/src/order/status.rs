//! Order status and the legal transition table
//!
//! The happy path is `Pending -> Confirmed -> Preparing -> Ready ->
//! Completed`. `Cancelled` is reachable from any non-terminal status,
//! `Failed` only from `Pending`. `Completed`, `Cancelled` and `Failed`
//! are terminal. Guards (payment, actor scope, cancel reason) are
//! evaluated by the server's transition module; this table is only
//! about structural adjacency.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created and validated, awaiting confirmation
    #[default]
    Pending,
    /// Payment authorized (or channel requires none)
    Confirmed,
    /// Kitchen station acknowledged
    Preparing,
    /// Kitchen marked complete
    Ready,
    /// Expo/customer confirmed delivery
    Completed,
    /// Cancelled by an actor with cancellation scope
    Cancelled,
    /// Validation/payment failure before confirmation
    Failed,
}

impl OrderStatus {
    /// Whether this status accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }

    /// Whether `self -> to` is a legal transition
    ///
    /// Cancellation is legal from any non-terminal status. Every other
    /// edge follows the happy path, plus `Pending -> Failed`.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == Self::Cancelled {
            return true;
        }
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Failed)
                | (Self::Confirmed, Self::Preparing)
                | (Self::Preparing, Self::Ready)
                | (Self::Ready, Self::Completed)
        )
    }

    /// All statuses legally reachable from this one
    pub fn successors(&self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Failed, Self::Cancelled],
            Self::Confirmed => &[Self::Preparing, Self::Cancelled],
            Self::Preparing => &[Self::Ready, Self::Cancelled],
            Self::Ready => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled | Self::Failed => &[],
        }
    }

    /// Wire-format name (SCREAMING_SNAKE_CASE, matches serde)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
