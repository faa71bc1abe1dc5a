//! Dashboard refresh loop.
//!
//! This module fetches the upstream collections, assembles a snapshot and
//! publishes it, either on a fixed interval or on demand.

use crate::config::Config;
use crate::error::FetchError;
use crate::source::DataSource;
use crate::store::{
    assemble, AssembleOptions, Clock, DashboardInputs, SnapshotState, SnapshotStore,
    SourceStatus, Sources,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Configuration for the refresher.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// How often to refresh automatically (default: 30s).
    pub interval: Duration,

    /// List sizes used when assembling snapshots.
    pub options: AssembleOptions,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            options: AssembleOptions::default(),
        }
    }
}

impl From<&Config> for RefreshConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.refresh.interval(),
            options: AssembleOptions::from(&config.dashboard),
        }
    }
}

/// Drives fetch → assemble → publish cycles.
pub struct Refresher {
    source: Arc<dyn DataSource>,
    store: Arc<SnapshotStore>,
    clock: Arc<dyn Clock>,
    config: RefreshConfig,
}

impl Refresher {
    pub fn new(
        source: Arc<dyn DataSource>,
        store: Arc<SnapshotStore>,
        clock: Arc<dyn Clock>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Runs one cycle right away and returns the resulting state.
    ///
    /// If an automatic cycle is still in flight, its result is dropped
    /// once this one settles.
    pub async fn refresh_now(&self) -> SnapshotState {
        tracing::info!("Manual dashboard refresh requested");
        self.run_cycle().await
    }

    /// Performs a single fetch-and-aggregate cycle.
    ///
    /// Failed collections are treated as empty. If every collection fails,
    /// nothing is recomputed and the previous snapshot is marked stale.
    pub async fn run_cycle(&self) -> SnapshotState {
        let generation = self.store.begin_cycle();
        tracing::debug!(generation, "Refresh cycle started");

        let (inputs, sources) = fetch_all(self.source.as_ref()).await;
        let failed = sources.failed_count();

        if failed == sources.iter().count() {
            let error = sources
                .iter()
                .filter_map(|(_, status)| match status {
                    SourceStatus::Failed { error } => Some(error.as_str()),
                    SourceStatus::Ok { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("; ");

            tracing::error!(generation, %error, "All upstream fetches failed, keeping last snapshot");
            self.store.mark_failed(
                generation,
                format!("all upstream fetches failed: {error}"),
                self.clock.now(),
            );
            return self.store.current();
        }

        let snapshot = assemble(
            &inputs,
            self.clock.local_now(),
            self.clock.now(),
            sources,
            &self.config.options,
        );

        let published = self.store.publish(generation, snapshot, inputs.logs);
        if published {
            tracing::info!(
                generation,
                orders = inputs.orders.len(),
                failed_sources = failed,
                "Dashboard snapshot published"
            );
        }

        self.store.current()
    }

    /// Spawns the automatic refresh task.
    ///
    /// The first cycle runs immediately. Ticks that fall due while a cycle
    /// is still running are skipped. The task ends when `shutdown` flips to
    /// `true` or its sender is dropped.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval = ?self.config.interval,
                "Dashboard refresh task started"
            );

            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_cycle().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Dashboard refresh task shutting down");
        })
    }
}

fn settle<T>(result: Result<Vec<T>, FetchError>) -> (Vec<T>, SourceStatus) {
    match result {
        Ok(records) => {
            let count = records.len();
            (records, SourceStatus::Ok { count })
        }
        Err(e) => {
            tracing::warn!(
                collection = e.collection(),
                error = %e,
                "Upstream fetch failed, using empty collection"
            );
            (
                Vec::new(),
                SourceStatus::Failed {
                    error: e.to_string(),
                },
            )
        }
    }
}

/// Fetches all five collections concurrently.
async fn fetch_all(source: &dyn DataSource) -> (DashboardInputs, Sources) {
    let (orders, products, categories, reservations, logs) = tokio::join!(
        source.orders(),
        source.products(),
        source.categories(),
        source.reservations(),
        source.activity_logs(),
    );

    let (orders, orders_status) = settle(orders);
    let (products, products_status) = settle(products);
    let (categories, categories_status) = settle(categories);
    let (reservations, reservations_status) = settle(reservations);
    let (logs, logs_status) = settle(logs);

    (
        DashboardInputs {
            orders,
            products,
            categories,
            reservations,
            logs,
        },
        Sources {
            orders: orders_status,
            products: products_status,
            categories: categories_status,
            reservations: reservations_status,
            logs: logs_status,
        },
    )
}
