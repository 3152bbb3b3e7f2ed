//! Shared application state for the status server.
//!
//! [`AppState`] pairs the snapshot store, which the pull endpoint reads,
//! with the broadcast hub, which push sockets subscribe to. Both are owned
//! elsewhere (the store by the aggregator, the hub by the daemon) and only
//! referenced here.

use std::sync::Arc;

use playstatus_core::SnapshotStore;

use crate::hub::BroadcastHub;

/// State handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest published snapshot, read by `GET /status.json`.
    pub store: SnapshotStore,
    /// Push subscriber registry, used by `GET /socket`.
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    /// Create state over an existing store and hub.
    pub const fn new(store: SnapshotStore, hub: Arc<BroadcastHub>) -> Self {
        Self { store, hub }
    }
}
