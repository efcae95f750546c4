//! Upstream payment-gateway boundary
//!
//! Payment authorization and capture live in the external payment
//! collaborator. The order path only ever asks one question: "is this
//! authorization reference valid for this order?" - and always asks it
//! *before* opening a store transaction (no lock is held across an
//! external call).
//!
//! Transport failures are retried with backoff here at the boundary and
//! surface as `UpstreamFailure`; a definitive "not authorized" answer
//! is not an error and is not retried.

mod http;
mod memory;

pub use http::HttpPaymentGateway;
pub use memory::StaticPaymentGateway;

use async_trait::async_trait;
use shared::AppError;
use thiserror::Error;

/// Payment boundary errors (transport/availability only)
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),

    #[error("payment gateway returned malformed response: {0}")]
    MalformedResponse(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        AppError::upstream(err.to_string())
    }
}

/// Verification of a payment authorization reference
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Whether `reference` is a valid authorization for the given order
    ///
    /// `Ok(false)` is a definitive decline; `Err` means the collaborator
    /// could not answer (after retries).
    async fn verify_authorization(
        &self,
        restaurant_id: &str,
        order_id: &str,
        reference: &str,
    ) -> Result<bool, PaymentError>;
}
