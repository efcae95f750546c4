//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu/catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility (Rust, TypeScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// Actor is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1002,
    /// Token is invalid
    TokenInvalid = 1003,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// A specific scope is required for this operation
    ScopeRequired = 2002,

    // ==================== 3xxx: Tenant ====================
    /// Claimed restaurant is not in the actor's permitted set
    TenantMismatch = 3001,
    /// No restaurant id was supplied with the request
    TenantNotResolved = 3002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested status change is not a legal transition
    InvalidTransition = 4002,
    /// Stored version does not match the expected version
    ConcurrentModification = 4003,
    /// Order is in a terminal status and cannot be mutated
    OrderTerminal = 4004,
    /// Declared totals do not reconcile
    TotalMismatch = 4005,
    /// Order has no line items
    OrderEmpty = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment authorization missing or not verified
    PaymentNotAuthorized = 5001,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found in this restaurant's catalog
    MenuItemNotFound = 6001,
    /// Menu item exists but is currently unavailable
    MenuItemUnavailable = 6002,
    /// Modifier is not legal for its parent menu item
    ModifierNotAllowed = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage layer error
    StorageError = 9002,
    /// Upstream collaborator unavailable or failing
    UpstreamFailure = 9003,
    /// Operation timed out
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",
            Self::NotAuthenticated => "Not authenticated",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Token is invalid",
            Self::PermissionDenied => "Permission denied",
            Self::ScopeRequired => "Missing required scope",
            Self::TenantMismatch => "Restaurant not permitted for this actor",
            Self::TenantNotResolved => "Restaurant id not supplied",
            Self::OrderNotFound => "Order not found",
            Self::InvalidTransition => "Illegal status transition",
            Self::ConcurrentModification => "Order was modified concurrently",
            Self::OrderTerminal => "Order is in a terminal status",
            Self::TotalMismatch => "Declared totals do not reconcile",
            Self::OrderEmpty => "Order has no line items",
            Self::PaymentNotAuthorized => "Payment not authorized",
            Self::MenuItemNotFound => "Menu item not found",
            Self::MenuItemUnavailable => "Menu item unavailable",
            Self::ModifierNotAllowed => "Modifier not allowed for item",
            Self::InternalError => "Internal server error",
            Self::StorageError => "Storage error",
            Self::UpstreamFailure => "Upstream service unavailable",
            Self::TimeoutError => "Operation timed out",
        }
    }

    /// Numeric value of this error code
    pub fn value(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.value())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

/// Error returned when deserializing an unknown error code value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::RequiredField,
            7 => Self::ValueOutOfRange,
            1001 => Self::NotAuthenticated,
            1002 => Self::TokenExpired,
            1003 => Self::TokenInvalid,
            2001 => Self::PermissionDenied,
            2002 => Self::ScopeRequired,
            3001 => Self::TenantMismatch,
            3002 => Self::TenantNotResolved,
            4001 => Self::OrderNotFound,
            4002 => Self::InvalidTransition,
            4003 => Self::ConcurrentModification,
            4004 => Self::OrderTerminal,
            4005 => Self::TotalMismatch,
            4006 => Self::OrderEmpty,
            5001 => Self::PaymentNotAuthorized,
            6001 => Self::MenuItemNotFound,
            6002 => Self::MenuItemUnavailable,
            6003 => Self::ModifierNotAllowed,
            9001 => Self::InternalError,
            9002 => Self::StorageError,
            9003 => Self::UpstreamFailure,
            9004 => Self::TimeoutError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_codes() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::TenantMismatch,
            ErrorCode::InvalidTransition,
            ErrorCode::ConcurrentModification,
            ErrorCode::PaymentNotAuthorized,
            ErrorCode::MenuItemNotFound,
            ErrorCode::UpstreamFailure,
        ];
        for code in codes {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::ConcurrentModification).unwrap();
        assert_eq!(json, "4003");
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::ConcurrentModification);
    }
}
