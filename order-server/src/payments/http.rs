//! HTTP payment gateway client

use super::{PaymentError, PaymentGateway};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Initial retry backoff; doubles per attempt
const BACKOFF_BASE_MS: u64 = 100;

/// Authorization lookup response from the payment collaborator
#[derive(Debug, Deserialize)]
struct AuthorizationResponse {
    status: String,
}

/// Payment gateway backed by the collaborator's HTTP API
pub struct HttpPaymentGateway {
    base_url: String,
    client: reqwest::Client,
    retries: u32,
}

impl HttpPaymentGateway {
    /// Create a client for the given base URL
    pub fn new(base_url: String, timeout_ms: u64, retries: u32) -> Result<Self, shared::AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| shared::AppError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries,
        })
    }

    async fn fetch_status(
        &self,
        restaurant_id: &str,
        order_id: &str,
        reference: &str,
    ) -> Result<AuthorizationResponse, PaymentError> {
        let url = format!("{}/authorizations/{}", self.base_url, reference);
        let response = self
            .client
            .get(&url)
            .query(&[("restaurant_id", restaurant_id), ("order_id", order_id)])
            .send()
            .await
            .map_err(|e| PaymentError::Unavailable(e.to_string()))?;

        if response.status().is_server_error() {
            return Err(PaymentError::Unavailable(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        // 404 = unknown reference, a definitive decline
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(AuthorizationResponse {
                status: "UNKNOWN".to_string(),
            });
        }

        response
            .json::<AuthorizationResponse>()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn verify_authorization(
        &self,
        restaurant_id: &str,
        order_id: &str,
        reference: &str,
    ) -> Result<bool, PaymentError> {
        let mut attempt = 0;
        loop {
            match self.fetch_status(restaurant_id, order_id, reference).await {
                Ok(resp) => return Ok(resp.status == "AUTHORIZED"),
                Err(PaymentError::Unavailable(msg)) if attempt < self.retries => {
                    let backoff = Duration::from_millis(BACKOFF_BASE_MS << attempt);
                    tracing::warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %msg,
                        "Payment gateway unavailable, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(order_id, error = %e, "Payment verification failed");
                    return Err(e);
                }
            }
        }
    }
}
