//! Real-time subscription endpoint
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/stream | GET | WebSocket stream of transition events |
//!
//! The upgrade only happens after actor authentication and tenant
//! resolution, and the socket is fed from that restaurant's broadcast
//! channel only. A client that lags far enough to drop events receives
//! a `RESYNC` marker and is expected to refetch order state over HTTP;
//! there is no event replay.

use axum::{
    Router,
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;
use crate::tenant::TenantContext;

/// Marker sent when the subscriber lagged and events were dropped
const RESYNC_MESSAGE: &str = "{\"type\":\"RESYNC\"}";

/// Stream router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stream", get(subscribe))
}

/// Upgrade to a WebSocket carrying this restaurant's transition events
pub async fn subscribe(
    State(state): State<ServerState>,
    ctx: TenantContext,
    ws: WebSocketUpgrade,
) -> Response {
    let restaurant_id = ctx.restaurant_id().to_string();
    tracing::info!(
        restaurant_id = %restaurant_id,
        actor_id = %ctx.actor().id,
        "Display client subscribing"
    );
    ws.on_upgrade(move |socket| forward_events(socket, state, restaurant_id))
}

/// Pump broadcast events into the socket until either side closes
async fn forward_events(socket: WebSocket, state: ServerState, restaurant_id: String) {
    let mut rx = state.notifier.subscribe(&restaurant_id);
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = rx.recv() => {
                let payload = match event {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize transition event");
                            continue;
                        }
                    },
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(
                            restaurant_id = %restaurant_id,
                            missed,
                            "Subscriber lagged, requesting resync"
                        );
                        RESYNC_MESSAGE.to_string()
                    }
                    Err(RecvError::Closed) => break,
                };
                if sink.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    // Clients only ever send pings/closes
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    tracing::debug!(restaurant_id = %restaurant_id, "Display client disconnected");
}
