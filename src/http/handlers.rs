use super::state::AppState;
use crate::messages::{ClientMessage, ServerMessage};
use crate::session::CallSession;
use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Frames buffered per direction before backpressure kicks in.
const CHANNEL_CAPACITY: usize = 32;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
/// Stateless readiness probe: no session context, no side effects.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "SERVING" })
}

/// GET /call
/// Upgrade to a WebSocket carrying one duplex call stream.
///
/// The session pool is checked before the upgrade so a full server turns
/// connections away instead of accepting and stalling them.
pub async fn stream_call(
    State(state): State<AppState>,
    ws: Option<WebSocketUpgrade>,
) -> impl IntoResponse {
    let permit = match state.session_permits.clone().try_acquire_owned() {
        Ok(permit) => permit,
        Err(_) => {
            warn!("session pool exhausted, rejecting call");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "session pool exhausted".to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some(ws) = ws else {
        return (
            StatusCode::UPGRADE_REQUIRED,
            Json(ErrorResponse {
                error: "websocket upgrade required".to_string(),
            }),
        )
            .into_response();
    };

    ws.on_upgrade(move |socket| async move {
        handle_call(socket, state).await;
        drop(permit);
    })
    .into_response()
}

/// Bridge one WebSocket to one `CallSession`.
///
/// Inbound frames are decoded and fed to the dispatcher; echoed responses
/// are forwarded to the socket as they are produced, in order. Dropping the
/// inbound sender is how peer stream closure reaches the state machine.
async fn handle_call(socket: WebSocket, state: AppState) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (inbound_tx, inbound_rx) = mpsc::channel::<ClientMessage>(CHANNEL_CAPACITY);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerMessage>(CHANNEL_CAPACITY);

    let session = CallSession::new(
        state.config.recording.base_dir.clone(),
        state.config.profile(),
        state.config.policy(),
    );
    let session_task = tokio::spawn(session.run(inbound_rx, outbound_tx));

    // Emitter side: forward responses as soon as they are available
    let emit_task = tokio::spawn(async move {
        while let Some(response) = outbound_rx.recv().await {
            let frame = match serde_json::to_string(&response) {
                Ok(frame) => frame,
                Err(e) => {
                    error!("failed to encode server message: {}", e);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    // Inbound side: decode client frames and feed the dispatcher
    while let Some(frame) = ws_rx.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                debug!("websocket receive error: {}", e);
                break;
            }
        };

        let text = match frame {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // Pings are answered by axum; other frame kinds carry nothing
            _ => continue,
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => {
                if inbound_tx.send(message).await.is_err() {
                    // Dispatcher already terminated
                    break;
                }
            }
            Err(e) => {
                warn!("malformed client frame, closing stream: {}", e);
                break;
            }
        }
    }

    // Signal stream closure to the dispatcher and let teardown run
    drop(inbound_tx);

    match session_task.await {
        Ok(stats) => info!(
            call_id = %stats.call_id,
            outcome = ?stats.outcome,
            bytes = stats.bytes_written,
            "call ended"
        ),
        Err(e) => error!("call session task panicked: {}", e),
    }
    let _ = emit_task.await;
}
