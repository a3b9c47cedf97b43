//! # Docrelay Server
//!
//! HTTP/WebSocket façade dispatching client-specified operations onto a
//! document store.
//!
//! This crate provides:
//! - `Dispatcher`: maps a closed set of method names onto store operations
//! - Delta-sync resolution (`getDifference`)
//! - Credential verification and the Argon2id hash utility
//! - Seed admin bootstrap
//! - Two transports over one dispatcher: request/response HTTP and an
//!   event/callback socket with peer refresh broadcasts
//!
//! # Architecture
//!
//! Everything hangs off one explicitly constructed [`docrelay_core::Store`];
//! there is no global connection state. The dispatcher performs no locking
//! of its own and accepts unbounded concurrent calls; each call suspends
//! only its own task while the store works.
//!
//! # Example
//!
//! ```rust,ignore
//! use docrelay_server::{serve, ServerConfig};
//!
//! let config = ServerConfig::default().with_admin_password("change-me");
//! serve(config).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Server code propagates errors; unwrap/expect stay confined to tests.
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod credentials;
mod dispatch;
mod error;
mod hash;
mod http;
mod seed;
mod server;
mod state;
mod sync;
mod ws;

pub use config::{ConfigError, ServerConfig};
pub use credentials::{
    CredentialVerifier, ACTIVE_FIELD, PASSWORD_FIELD, USERNAME_FIELD, USERS_COLLECTION,
};
pub use dispatch::Dispatcher;
pub use error::{ServerError, ServerResult};
pub use hash::PasswordHasher;
pub use http::app_router;
pub use seed::{ensure_admin, ADMIN_USERNAME, ADMIN_USER_ID};
pub use server::{serve, serve_with_state};
pub use state::{AppState, PeerBroadcast};
pub use sync::difference;
