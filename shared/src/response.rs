//! API response types
//!
//! Standardized API response envelope used by every endpoint.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Numeric code for a successful response
pub const API_CODE_SUCCESS: u16 = 0;

/// Unified API response structure
///
/// All API responses follow this format:
/// ```json
/// {
///     "code": 0,
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
///
/// Errors carry a non-zero `code` and, where applicable, structured
/// `details` (e.g. the `fields` list on validation failures).
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (0 = success, others = error codes)
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Structured error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
    /// Request trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            code: API_CODE_SUCCESS,
            message: "Success".to_string(),
            data: Some(data),
            details: None,
            trace_id: None,
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: API_CODE_SUCCESS,
            message: message.into(),
            data: Some(data),
            details: None,
            trace_id: None,
        }
    }

    /// Create an error response from an [`AppError`]
    pub fn from_error(err: &AppError) -> Self {
        Self {
            code: err.code.value(),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
            trace_id: None,
        }
    }

    /// Add trace ID to response
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_ok_envelope() {
        let resp = ApiResponse::ok(42);
        assert_eq!(resp.code, API_CODE_SUCCESS);
        assert_eq!(resp.data, Some(42));
    }

    #[test]
    fn test_error_envelope_carries_details() {
        let err = AppError::concurrent_modification(3, 4);
        let resp = ApiResponse::<()>::from_error(&err);
        assert_eq!(resp.code, ErrorCode::ConcurrentModification.value());
        assert!(resp.details.is_some());
        assert!(resp.data.is_none());
    }
}
