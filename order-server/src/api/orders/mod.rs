//! Order API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | POST | Submit a new order |
//! | /api/orders | GET | List active orders (optional status filter) |
//! | /api/orders/{id} | GET | Fetch one order |
//! | /api/orders/{id}/transition | POST | Apply a status transition |
//!
//! Every route authenticates the actor and resolves the tenant context
//! through the [`crate::tenant::TenantContext`] extractor.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::submit).get(handler::list_active))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/transition", post(handler::transition))
}
