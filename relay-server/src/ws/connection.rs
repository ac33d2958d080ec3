//! WebSocket connection handling
//!
//! Each socket is admitted into the ConnectionRegistry under the device
//! identifier from its handshake query, then driven by a single select
//! loop over inbound frames and the session's outbound queue. Rejected
//! sockets are closed before any handler runs; cleanup on every exit
//! path is idempotent.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Query, State};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use relay_core::error::AdmissionError;
use relay_core::keepalive::spawn_keepalive;
use relay_core::protocol::{ClientMessage, ServerMessage};
use relay_core::registry::OutboundSender;
use relay_core::session::DeviceSession;

use crate::AppState;

/// Handshake query parameters
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Device identifier; connections without one are refused
    #[serde(rename = "deviceId", default)]
    pub device_id: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<ConnectQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query))
}

/// Handle one WebSocket connection from handshake to cleanup
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, query: ConnectQuery) {
    let mut session = DeviceSession::new(query.device_id.unwrap_or_default());
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();

    let admitted = state
        .registry
        .admit(session.device_id(), session.channel_id(), outbound_tx.clone())
        .await;
    if let Err(e) = admitted {
        info!(channel_id = %session.channel_id(), "refusing connection: {}", e);
        session.close();
        refuse_socket(socket, &e).await;
        return;
    }
    if let Err(e) = session.activate() {
        warn!(device_id = %session.device_id(), "session activation failed: {}", e);
    }

    info!(
        device_id = %session.device_id(),
        channel_id = %session.channel_id(),
        "device connected"
    );

    session.set_keepalive(spawn_keepalive(
        session.device_id().to_string(),
        outbound_tx.clone(),
        state.keepalive_interval,
    ));

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            frame = receiver.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        handle_text_message(&text, &session, &state, &outbound_tx).await;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {
                        // Binary and pong frames are ignored
                    }
                    Some(Err(e)) => {
                        warn!(device_id = %session.device_id(), "websocket error: {}", e);
                        break;
                    }
                }
            }

            queued = outbound_rx.recv() => {
                let Some(msg) = queued else { break };
                match serde_json::to_string(&msg) {
                    Ok(json) => {
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("failed to serialize outbound message: {}", e),
                }
            }
        }
    }

    // Same cleanup on every exit path; both steps are idempotent
    session.close();
    state
        .registry
        .release(session.device_id(), session.channel_id())
        .await;
    info!(device_id = %session.device_id(), "device disconnected");
}

/// Dispatch one inbound text frame
async fn handle_text_message(
    text: &str,
    session: &DeviceSession,
    state: &Arc<AppState>,
    replies: &OutboundSender,
) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(device_id = %session.device_id(), "ignoring unparseable message: {}", e);
            return;
        }
    };

    match msg {
        ClientMessage::Register { device_id } => {
            // Advisory only: a mismatched identifier changes nothing
            if device_id == session.device_id() {
                debug!(device_id = %device_id, "device registered");
            } else {
                debug!(
                    device_id = %session.device_id(),
                    claimed = %device_id,
                    "ignoring register with mismatched device id"
                );
            }
        }

        ClientMessage::Message { payload } => {
            let delivered = state
                .registry
                .broadcast(&ServerMessage::message(payload))
                .await;
            debug!(
                device_id = %session.device_id(),
                delivered,
                "broadcast fanned out"
            );
        }

        ClientMessage::Heartbeat { timestamp } => {
            debug!(
                device_id = %session.device_id(),
                client_timestamp = %timestamp,
                "heartbeat"
            );
            let ack = ServerMessage::heartbeat_ack(Utc::now().to_rfc3339());
            if replies.send(ack).is_err() {
                warn!(device_id = %session.device_id(), "failed to queue heartbeat ack");
            }
        }
    }
}

/// Close a refused socket with a policy-violation frame before dropping it
async fn refuse_socket(mut socket: WebSocket, reason: &AdmissionError) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: reason.to_string().into(),
    };
    let _ = socket.send(Message::Close(Some(frame))).await;
}
