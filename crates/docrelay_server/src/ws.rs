//! Event/callback socket transport.
//!
//! Clients send JSON frames naming an event (`login`, `hash`, `dbCall`,
//! `datachange`) and receive exactly one terminal reply per frame, success
//! or failure; a call can never be left hanging. A `datachange` frame
//! additionally fans a `refresh_data` broadcast out to every other
//! connected peer, fire-and-forget.

use crate::error::{ServerError, ServerResult};
use crate::state::{AppState, PeerBroadcast};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use docrelay_protocol::{
    BroadcastFrame, ClientFrame, DataChange, DbRequest, HashRequest, HashResponse, LoginRequest,
    LoginResponse, ServerReply, SocketEvent,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

/// Upgrades `GET /api/socket` into a socket session.
pub async fn socket_upgrade(State(state): State<AppState>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: AppState, mut socket: WebSocket) {
    let conn_id = Uuid::new_v4();
    let mut peers = state.events.subscribe();
    tracing::debug!(%conn_id, "socket connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let Some(Ok(message)) = incoming else { break };
                match message {
                    Message::Text(text) => {
                        let reply = handle_frame(&state, conn_id, text.as_str());
                        let Ok(json) = serde_json::to_string(&reply) else { break };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    // Ping/pong is handled by the protocol layer; binary
                    // frames are not part of this transport.
                    _ => {}
                }
            }
            notification = peers.recv() => {
                match notification {
                    Ok(peer) => {
                        if peer.sender == conn_id {
                            continue;
                        }
                        let Ok(json) = serde_json::to_string(&peer.frame) else { continue };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    // Fire-and-forget: a lagging peer just misses frames.
                    Err(RecvError::Lagged(missed)) => {
                        tracing::debug!(%conn_id, missed, "peer lagged behind broadcasts");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(%conn_id, "socket disconnected");
}

/// Handles one client frame, producing exactly one reply.
fn handle_frame(state: &AppState, conn_id: Uuid, text: &str) -> ServerReply {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            let err = ServerError::missing_input(format!("malformed frame: {err}"));
            return ServerReply::failure(None, err.to_body_value());
        }
    };

    let id = frame.id;
    match dispatch_frame(state, conn_id, frame) {
        Ok(result) => ServerReply::success(id, result),
        Err(err) => ServerReply::failure(id, err.to_body_value()),
    }
}

fn dispatch_frame(state: &AppState, conn_id: Uuid, frame: ClientFrame) -> ServerResult<Value> {
    let event = SocketEvent::parse(&frame.event)
        .ok_or_else(|| ServerError::UnsupportedMethod(frame.event.clone()))?;

    match event {
        SocketEvent::Login => {
            let request: LoginRequest = parse_payload(frame.payload)?;
            let user = state
                .verifier
                .verify(&request.username, &request.password)?;
            to_value(LoginResponse::success(user.into_value()))
        }
        SocketEvent::Hash => {
            let request: HashRequest = parse_payload(frame.payload)?;
            let hash = state.hasher.hash(&request.text)?;
            to_value(HashResponse { hash })
        }
        SocketEvent::DbCall => {
            let request: DbRequest = parse_payload(frame.payload)?;
            state.dispatcher.dispatch(&request)
        }
        SocketEvent::DataChange => {
            let notice: DataChange = parse_payload(frame.payload)?;
            // Send fails only when no peer is listening, which is fine for
            // a fire-and-forget notification.
            let _ = state.events.send(PeerBroadcast {
                sender: conn_id,
                frame: BroadcastFrame::refresh(&notice.collection),
            });
            to_value(serde_json::json!({"acknowledged": true}))
        }
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Value) -> ServerResult<T> {
    serde_json::from_value(payload)
        .map_err(|err| ServerError::missing_input(format!("payload: {err}")))
}

fn to_value<T: serde::Serialize>(result: T) -> ServerResult<Value> {
    serde_json::to_value(result)
        .map_err(|err| ServerError::Internal(format!("result serialization failed: {err}")))
}
