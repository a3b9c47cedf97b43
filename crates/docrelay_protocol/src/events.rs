//! Frames for the event/callback socket transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Event name broadcast to peers after a reported data change.
pub const REFRESH_EVENT: &str = "refresh_data";

/// The closed set of events a socket client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketEvent {
    /// Credential check; payload is a `LoginRequest`.
    Login,
    /// Hash utility; payload is a `HashRequest`.
    Hash,
    /// Generic database operation; payload is a `DbRequest`.
    DbCall,
    /// A peer reports it changed data; payload is a `DataChange`.
    DataChange,
}

impl SocketEvent {
    /// Parses a wire event name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "login" => Some(SocketEvent::Login),
            "hash" => Some(SocketEvent::Hash),
            "dbCall" => Some(SocketEvent::DbCall),
            "datachange" => Some(SocketEvent::DataChange),
            _ => None,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SocketEvent::Login => "login",
            SocketEvent::Hash => "hash",
            SocketEvent::DbCall => "dbCall",
            SocketEvent::DataChange => "datachange",
        }
    }
}

impl fmt::Display for SocketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A frame sent by a socket client.
///
/// `id` is an opaque correlation number echoed back in the reply; clients
/// that pipeline frames use it to match replies to calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientFrame {
    /// Wire event name (see `SocketEvent`).
    pub event: String,
    /// Correlation id, echoed in the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Event payload.
    #[serde(default)]
    pub payload: Value,
}

/// The single terminal reply to a client frame.
///
/// Every frame gets exactly one reply, success or failure; a client can
/// therefore always resolve a pending call and never hangs on an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerReply {
    /// Correlation id copied from the frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Whether the call succeeded.
    pub ok: bool,
    /// Result payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error body on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ServerReply {
    /// Builds a success reply.
    pub fn success(id: Option<u64>, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    /// Builds a failure reply.
    pub fn failure(id: Option<u64>, error: Value) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Payload of a `datachange` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChange {
    /// Collection the sender changed.
    pub collection: String,
}

/// Frame broadcast to all other connected peers after a `datachange`.
/// Fire-and-forget: no delivery guarantee and no replay for peers that
/// were offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastFrame {
    /// Always `refresh_data`.
    pub event: String,
    /// Collection that changed.
    pub collection: String,
}

impl BroadcastFrame {
    /// Builds a refresh broadcast for a collection.
    pub fn refresh(collection: impl Into<String>) -> Self {
        Self {
            event: REFRESH_EVENT.to_string(),
            collection: collection.into(),
        }
    }
}
