//! Shared application state.

use crate::config::ServerConfig;
use crate::credentials::CredentialVerifier;
use crate::dispatch::Dispatcher;
use crate::error::ServerResult;
use crate::hash::PasswordHasher;
use docrelay_core::Store;
use docrelay_protocol::BroadcastFrame;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// A refresh notification on its way to other peers, tagged with the
/// connection that caused it so the sender can be skipped.
#[derive(Debug, Clone)]
pub struct PeerBroadcast {
    /// Connection that reported the change.
    pub sender: Uuid,
    /// Frame delivered to every other peer.
    pub frame: BroadcastFrame,
}

/// State shared by every transport handler.
///
/// Built once at startup around a single store; clones are cheap handles
/// onto the same components.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The document store.
    pub store: Store,
    /// Operation dispatcher over the store.
    pub dispatcher: Arc<Dispatcher>,
    /// Credential verifier over the store's users collection.
    pub verifier: Arc<CredentialVerifier>,
    /// Password hash utility.
    pub hasher: Arc<PasswordHasher>,
    /// Peer broadcast channel for `datachange` notifications.
    pub events: broadcast::Sender<PeerBroadcast>,
}

impl AppState {
    /// Builds the full component graph from a configuration, with a fresh
    /// empty store.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        Self::with_store(config, Store::new())
    }

    /// Builds the component graph around an existing store.
    pub fn with_store(config: ServerConfig, store: Store) -> ServerResult<Self> {
        let hasher = Arc::new(PasswordHasher::from_config(&config)?);
        let dispatcher = Arc::new(Dispatcher::new(store.clone()));
        let verifier = Arc::new(CredentialVerifier::new(store.clone(), Arc::clone(&hasher)));
        let (events, _) = broadcast::channel(config.broadcast_capacity);

        Ok(Self {
            config: Arc::new(config),
            store,
            dispatcher,
            verifier,
            hasher,
            events,
        })
    }
}
