//! HTTP status mapping and axum response conversion

use super::codes::ErrorCode;
use super::types::AppError;
use crate::response::ApiResponse;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::MenuItemNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (client must reload / illegal state change)
            Self::AlreadyExists
            | Self::ConcurrentModification
            | Self::InvalidTransition
            | Self::OrderTerminal => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied
            | Self::ScopeRequired
            | Self::TenantMismatch
            | Self::TenantNotResolved => StatusCode::FORBIDDEN,

            // 422 Unprocessable Entity (field-level validation)
            Self::ValidationFailed | Self::TotalMismatch => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient, client can retry)
            Self::UpstreamFailure | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for remaining business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed");
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "Request rejected");
        }
        let body = ApiResponse::<()>::from_error(&self);
        (status, Json(body)).into_response()
    }
}
