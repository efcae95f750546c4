//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::orders::TransitionRequest;
use crate::tenant::TenantContext;
use shared::ApiResponse;
use shared::error::AppResult;
use shared::order::{OrderRecord, OrderStatus, OrderSubmission};

/// Submission acknowledgment
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Order id
    pub order_id: String,
    /// Human-readable order number
    pub order_number: String,
    /// Initial status
    pub status: OrderStatus,
    /// Optimistic version of the created record
    pub version: u64,
    /// Creation timestamp (UTC millis)
    pub created_at: i64,
}

/// Submit a new order
pub async fn submit(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(submission): Json<OrderSubmission>,
) -> AppResult<Json<ApiResponse<SubmitResponse>>> {
    let record = state.orders.submit_order(&ctx, submission).await?;
    Ok(Json(ApiResponse::ok(SubmitResponse {
        order_id: record.id,
        order_number: record.order_number,
        status: record.status,
        version: record.version,
        created_at: record.created_at,
    })))
}

/// Query params for listing active orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional status filter (e.g. `PREPARING` for the kitchen board)
    pub status: Option<OrderStatus>,
}

/// List the restaurant's active orders
pub async fn list_active(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderRecord>>>> {
    let orders = state.orders.list_active(&ctx, query.status)?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// Fetch one order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    let order = state.orders.get_order(&ctx, &id)?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Transition request body
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    /// Desired status
    pub to: OrderStatus,
    /// Version the caller last read
    pub expected_version: u64,
    /// Reason (mandatory for CANCELLED)
    pub reason: Option<String>,
    /// Payment authorization reference (CONFIRMED on prepaid channels)
    pub payment_reference: Option<String>,
}

/// Apply a status transition
pub async fn transition(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(body): Json<TransitionBody>,
) -> AppResult<Json<ApiResponse<OrderRecord>>> {
    let request = TransitionRequest {
        to: body.to,
        reason: body.reason,
        payment_reference: body.payment_reference,
    };
    let updated = state
        .orders
        .apply_transition(&ctx, &id, body.expected_version, request)
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}
