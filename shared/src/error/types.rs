//! Error types and constructors

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;

/// A single field-level validation failure
///
/// The validator collects every failing check into one list so a client
/// can correct all issues at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path of the offending field, e.g. `items[2].quantity` or `total`
    pub field: String,
    /// Error code for this specific failure
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// Application error with structured error code and details
///
/// The primary error type across the service:
/// - standardized error codes via [`ErrorCode`]
/// - human-readable messages
/// - optional structured details (field errors, conflict context, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a validation error carrying the full field-error list
    ///
    /// Field errors are attached under the `fields` detail key. The
    /// message names the first failing field for log readability.
    pub fn validation_fields(fields: Vec<FieldError>) -> Self {
        let message = fields
            .first()
            .map(|f| format!("Validation failed: {}", f.field))
            .unwrap_or_else(|| "Validation failed".to_string());
        let value = serde_json::to_value(&fields).unwrap_or(Value::Null);
        Self::with_message(ErrorCode::ValidationFailed, message).with_detail("fields", value)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create a permission denied error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create a missing-scope error
    pub fn scope_required(scope: &str) -> Self {
        Self::with_message(
            ErrorCode::ScopeRequired,
            format!("Operation requires scope {}", scope),
        )
        .with_detail("scope", scope)
    }

    /// Create a tenant mismatch error
    ///
    /// Deliberately does not echo the claimed restaurant id back in the
    /// message so foreign tenant existence is not leaked.
    pub fn tenant_mismatch() -> Self {
        Self::new(ErrorCode::TenantMismatch)
    }

    /// Create an order not found error
    pub fn order_not_found(order_id: &str) -> Self {
        Self::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", order_id))
    }

    /// Create an invalid transition error naming the from/to pair
    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::with_message(
            ErrorCode::InvalidTransition,
            format!("Illegal transition {} -> {}", from, to),
        )
        .with_detail("from", from)
        .with_detail("to", to)
    }

    /// Create a concurrent modification error
    ///
    /// Carries expected/actual versions so the client can reload and
    /// retry with the current version.
    pub fn concurrent_modification(expected: u64, actual: u64) -> Self {
        Self::with_message(
            ErrorCode::ConcurrentModification,
            format!("Version mismatch: expected {}, stored {}", expected, actual),
        )
        .with_detail("expected_version", expected)
        .with_detail("actual_version", actual)
    }

    /// Create an upstream failure error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::UpstreamFailure, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageError, msg)
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TimeoutError, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_fields_detail() {
        let err = AppError::validation_fields(vec![
            FieldError::new("total", ErrorCode::TotalMismatch, "declared 1200, computed 1080"),
            FieldError::new("items[0].quantity", ErrorCode::ValueOutOfRange, "must be positive"),
        ]);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let fields = err.details.as_ref().unwrap().get("fields").unwrap();
        assert_eq!(fields.as_array().unwrap().len(), 2);
        assert!(err.message.contains("total"));
    }

    #[test]
    fn test_tenant_mismatch_leaks_nothing() {
        let err = AppError::tenant_mismatch();
        assert_eq!(err.code, ErrorCode::TenantMismatch);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_concurrent_modification_detail() {
        let err = AppError::concurrent_modification(3, 4);
        let details = err.details.unwrap();
        assert_eq!(details["expected_version"], 3);
        assert_eq!(details["actual_version"], 4);
    }
}
