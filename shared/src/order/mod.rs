//! Order domain types
//!
//! - **status**: the authoritative status enum and transition table
//! - **types**: channels, submissions, normalized line items
//! - **record**: the persisted order shape with its optimistic version
//! - **event**: transition events published to display clients

mod event;
mod record;
mod status;
mod types;

pub use event::TransitionEvent;
pub use record::OrderRecord;
pub use status::OrderStatus;
pub use types::{
    Channel, LineItem, LineItemInput, ModifierSnapshot, NormalizedOrder, OrderSubmission,
};

/// Money in integer minor-currency units (e.g. cents)
///
/// Financial fields are never floating point; totals must reconcile
/// with exact integer equality.
pub type Cents = i64;
