//! Shared application state for the HTTP server.

use crate::config::Config;
use crate::monitor::Refresher;
use crate::store::{SnapshotState, SnapshotStore};
use std::sync::Arc;
use tokio::sync::watch;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot cell written by the refresher.
    pub store: Arc<SnapshotStore>,

    /// Used by `POST /api/dashboard/refresh`.
    pub refresher: Arc<Refresher>,

    /// Effective configuration, as loaded at start-up.
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(refresher: Arc<Refresher>, config: Config) -> Self {
        Self {
            store: Arc::clone(refresher.store()),
            refresher,
            config: Arc::new(config),
        }
    }

    /// Subscribe to snapshot updates. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.store.subscribe()
    }
}
