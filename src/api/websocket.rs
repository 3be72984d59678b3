//! Event WebSocket: pushes every `PipelineEvent` to the dashboard client.
//!
//! Connection lifecycle:
//! 1. Client opens `GET /ws/events`
//! 2. Server sends a Welcome with the current status snapshot
//! 3. Every pipeline event is forwarded as JSON until either side closes
//! 4. A ping goes out every 30s so idle proxies keep the socket open

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::api::types::{ApiContext, WsOutgoing, WsWelcome};
use crate::dashboard::Dashboard;

/// Heartbeat interval for server pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// `GET /ws/events`: upgrade and start streaming.
pub async fn events_upgrade(
    ws: WebSocketUpgrade,
    State(ctx): State<ApiContext>,
) -> impl IntoResponse {
    let dashboard = Arc::clone(&ctx.dashboard);
    ws.on_upgrade(move |socket| stream_events(socket, dashboard))
}

async fn send_json(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: &WsOutgoing,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(msg) {
        Ok(j) => j,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize WebSocket message");
            return Ok(());
        }
    };
    sink.send(Message::Text(json)).await
}

async fn stream_events(socket: WebSocket, dashboard: Arc<Dashboard>) {
    let (mut sink, mut stream) = socket.split();
    // Subscribe before the snapshot so nothing falls between the two.
    let mut events = dashboard.subscribe_events();
    let session_id = uuid::Uuid::new_v4().to_string();

    let status = match dashboard.status() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Cannot read dashboard status for WebSocket");
            return;
        }
    };
    let welcome = WsOutgoing::Welcome(WsWelcome {
        kind: "Welcome",
        session_id: session_id.clone(),
        status,
    });
    if send_json(&mut sink, &welcome).await.is_err() {
        return;
    }
    tracing::info!(session_id = %session_id, "Event stream connected");

    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    heartbeat.tick().await; // Consume initial immediate tick

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_json(&mut sink, &WsOutgoing::Event(event)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(session_id = %session_id, skipped, "Event stream lagging");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {} // Client messages are ignored
                }
            }
            _ = heartbeat.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = sink.close().await;
    tracing::info!(session_id = %session_id, "Event stream disconnected");
}
