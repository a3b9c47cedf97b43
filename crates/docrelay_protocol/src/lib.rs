//! # Docrelay Protocol
//!
//! Wire types shared by the docrelay transports and clients.
//!
//! This crate provides:
//! - `Method`: the closed enumeration of database operations
//! - `DbRequest`: the generic operation envelope
//! - `SnapshotEntry` and watermark helpers for delta-sync
//! - Login and hash request/response bodies
//! - Socket frames for the event transport
//!
//! Everything here is plain data with serde derives; no transport or store
//! logic lives in this crate.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod events;
mod method;
mod request;
mod snapshot;

pub use auth::{HashRequest, HashResponse, LoginRequest, LoginResponse};
pub use events::{
    BroadcastFrame, ClientFrame, DataChange, ServerReply, SocketEvent, REFRESH_EVENT,
};
pub use method::Method;
pub use request::DbRequest;
pub use snapshot::{known_ids, watermark, SnapshotEntry};
