//! The current-snapshot cell.
//!
//! Holds the latest [`DashboardSnapshot`] plus its freshness flags and
//! replays it to every new subscriber. Each refresh cycle takes a
//! generation number up front; a cycle may only settle the cell if no
//! newer cycle has settled it already, so the latest-started refresh
//! always wins.

use super::types::{ActivityLogRecord, DashboardSnapshot, SourceStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// What subscribers see: the last good snapshot and how fresh it is.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotState {
    /// Last successfully assembled snapshot, `None` until the first one.
    pub snapshot: Option<Arc<DashboardSnapshot>>,

    /// `true` when the latest cycle could not reach any upstream service.
    pub stale: bool,

    /// Failure summary of the latest cycle, if any.
    pub last_error: Option<String>,

    pub last_attempt_at: Option<DateTime<Utc>>,

    /// When `snapshot` was generated.
    pub last_updated_at: Option<DateTime<Utc>>,

    /// Generation of the cycle that last settled this state.
    pub generation: u64,

    /// Activity logs from the same cycle as `snapshot`, for filtering.
    #[serde(skip)]
    pub logs: Arc<Vec<ActivityLogRecord>>,
}

/// Single-writer, multi-reader holder of the current [`SnapshotState`].
#[derive(Debug)]
pub struct SnapshotStore {
    tx: watch::Sender<SnapshotState>,

    /// Last generation handed out by [`SnapshotStore::begin_cycle`].
    started: AtomicU64,

    /// Last generation that settled the cell. Also serialises writes.
    settled: Mutex<u64>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SnapshotState::default());
        Self {
            tx,
            started: AtomicU64::new(0),
            settled: Mutex::new(0),
        }
    }

    /// Reserves the generation number for a new refresh cycle.
    pub fn begin_cycle(&self) -> u64 {
        self.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_started(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    /// Copy of the current state.
    pub fn current(&self) -> SnapshotState {
        self.tx.borrow().clone()
    }

    /// Receiver that starts with the current state and sees every update.
    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.tx.subscribe()
    }

    /// Installs a freshly assembled snapshot.
    ///
    /// Returns `false` (and changes nothing) when a newer cycle has
    /// already settled the cell.
    pub fn publish(
        &self,
        generation: u64,
        snapshot: DashboardSnapshot,
        logs: Vec<ActivityLogRecord>,
    ) -> bool {
        let mut settled = self.settled.lock().unwrap_or_else(PoisonError::into_inner);
        if generation <= *settled {
            tracing::debug!(
                generation,
                settled = *settled,
                "Discarding snapshot from superseded refresh"
            );
            return false;
        }
        *settled = generation;

        // Failure messages already name their collection.
        let failed: Vec<&str> = snapshot
            .sources
            .iter()
            .filter_map(|(_, status)| match status {
                SourceStatus::Failed { error } => Some(error.as_str()),
                SourceStatus::Ok { .. } => None,
            })
            .collect();
        let last_error = (!failed.is_empty()).then(|| failed.join("; "));

        let generated_at = snapshot.generated_at;
        self.tx.send_replace(SnapshotState {
            snapshot: Some(Arc::new(snapshot)),
            stale: false,
            last_error,
            last_attempt_at: Some(generated_at),
            last_updated_at: Some(generated_at),
            generation,
            logs: Arc::new(logs),
        });

        true
    }

    /// Records a cycle in which nothing could be fetched.
    ///
    /// The previous snapshot stays in place and the state is flagged stale.
    /// Returns `false` when a newer cycle has already settled the cell.
    pub fn mark_failed(&self, generation: u64, error: String, at: DateTime<Utc>) -> bool {
        let mut settled = self.settled.lock().unwrap_or_else(PoisonError::into_inner);
        if generation <= *settled {
            tracing::debug!(
                generation,
                settled = *settled,
                "Discarding failure from superseded refresh"
            );
            return false;
        }
        *settled = generation;

        self.tx.send_modify(|state| {
            state.stale = true;
            state.last_error = Some(error);
            state.last_attempt_at = Some(at);
            state.generation = generation;
        });

        true
    }
}
