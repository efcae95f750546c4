//! HTTP API assembly
//!
//! Routers per resource, plus the shared middleware stack: CORS, gzip
//! compression, request tracing, and x-request-id generation and
//! propagation.

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod health;
pub mod orders;
pub mod stream;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Order API - authentication + tenant resolution per handler
        .merge(orders::router())
        // Real-time subscription - authentication + tenant resolution
        .merge(stream::router())
        // Health API - public route
        .merge(health::router())
}

/// Concurrent in-flight request cap
const MAX_IN_FLIGHT_REQUESTS: usize = 1024;

/// Build the application with the full middleware stack
pub fn build_app(_state: &ServerState) -> Router<ServerState> {
    build_router()
        // Backpressure - cap concurrent in-flight requests app-wide
        .layer(GlobalConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
