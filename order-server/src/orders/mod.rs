//! Order lifecycle core
//!
//! # Components
//!
//! - **money**: integer minor-unit arithmetic and totals reconciliation
//! - **validator**: submission validation and normalization
//! - **transitions**: the transition guard layer over the status table
//! - **store**: redb persistence gateway with optimistic versioning
//! - **notifier**: per-restaurant transition broadcast
//! - **service**: orchestration of the above
//! - **expiry**: background worker failing stale pending orders
//!
//! # Flow
//!
//! ```text
//! submit_order(ctx, submission)
//!     ├─ 1. validate + normalize (all field errors in one pass)
//!     ├─ 2. allocate order number (own txn, before the write txn)
//!     ├─ 3. create PENDING record (atomic with its line items)
//!     └─ 4. broadcast creation event (fire-and-forget)
//!
//! apply_transition(ctx, order_id, expected_version, request)
//!     ├─ 1. load current record (tenant-scoped)
//!     ├─ 2. evaluate guards (scope, cancel reason, payment; awaited
//!     │     BEFORE any store transaction)
//!     ├─ 3. store.apply_transition: version check + legality recheck
//!     │     against the stored status, atomically
//!     └─ 4. broadcast transition event (fire-and-forget)
//! ```

mod expiry;
mod money;
mod notifier;
mod service;
mod store;
mod transitions;
mod validator;

pub use expiry::ExpiryWorker;
pub use money::{checked_line_total, checked_sum};
pub use notifier::TransitionNotifier;
pub use service::OrderService;
pub use store::{OrderStore, StoreError, StoreResult};
pub use transitions::{GuardContext, TransitionRequest, check_guards, required_scope};
pub use validator::validate_submission;
