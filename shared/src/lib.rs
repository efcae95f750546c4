//! Shared types for the order lifecycle service
//!
//! Domain and wire types used by the server and by client crates:
//! error codes, API response envelope, tenant/menu models, and the
//! order domain (statuses, submissions, records, transition events).

pub mod error;
pub mod models;
pub mod order;
pub mod response;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode, FieldError};
pub use response::ApiResponse;
