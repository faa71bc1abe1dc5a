//! RestoDash - Restaurant dashboard aggregation service
//!
//! Periodically pulls orders, products, categories, reservations and
//! activity logs from the restaurant REST services and serves the
//! aggregated dashboard over HTTP and WebSocket.

use restodash::config::load_config;
use restodash::error::AppError;
use restodash::monitor::{RefreshConfig, Refresher};
use restodash::server::{self, state::AppState};
use restodash::source::HttpDataSource;
use restodash::store::{SnapshotStore, SystemClock};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("restodash=info")),
        )
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║              RestoDash - Restaurant Dashboard              ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();

    println!("🔧 Loading configuration...");
    let config = load_config()?;
    println!("   ✓ Refresh every {}ms", config.refresh.interval_ms);

    println!("🔧 Preparing upstream client...");
    let source = HttpDataSource::new(
        config.services.clone(),
        config.auth.bearer_token.clone(),
        config.refresh.request_timeout(),
    )?;
    println!("   ✓ Orders service at {}", config.services.orders_url);

    let store = Arc::new(SnapshotStore::new());
    let refresher = Arc::new(Refresher::new(
        Arc::new(source),
        Arc::clone(&store),
        Arc::new(SystemClock),
        RefreshConfig::from(&config),
    ));

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        println!("\n🛑 Shutdown signal received...");
        let _ = shutdown_tx.send(true);
    })?;

    println!("🔧 Starting refresh task...");
    let refresh_handle = Arc::clone(&refresher).spawn(shutdown_rx.clone());
    println!("   ✓ Refresh task started");

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("🌐 API available at http://{}", address);
    println!("   • GET  /api/dashboard         - Current snapshot");
    println!("   • POST /api/dashboard/refresh - Refresh now");
    println!("   • GET  /api/logs              - Activity log");
    println!("   • WS   /ws                    - Real-time updates");
    println!("   Press Ctrl+C to quit");
    println!("════════════════════════════════════════════════════════════════");
    println!();

    server::serve(listener, AppState::new(refresher, config), shutdown_rx).await?;

    println!("\n⏳ Shutting down...");
    if let Err(e) = refresh_handle.await {
        tracing::error!(error = %e, "Refresh task ended abnormally");
    }

    print_summary(&store);

    println!("\n👋 RestoDash has exited. Goodbye!");
    Ok(())
}

fn print_summary(store: &SnapshotStore) {
    let state = store.current();
    let Some(snapshot) = state.snapshot else {
        println!("   No snapshot was produced.");
        return;
    };

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("📊 Last Dashboard Snapshot");
    println!("════════════════════════════════════════════════════════════════");
    println!("   Generated:     {}", snapshot.generated_at.to_rfc3339());
    println!("   Orders today:  {}", snapshot.kpi.today_orders);
    println!("   Revenue today: {:.2}", snapshot.kpi.today_revenue);
    println!("   Reservations:  {}", snapshot.kpi.active_reservations);
    if state.stale {
        println!("   ⚠ Stale: {}", state.last_error.unwrap_or_default());
    }

    if !snapshot.top_products.is_empty() {
        println!();
        println!("Top Products:");
        for (i, product) in snapshot.top_products.iter().enumerate() {
            println!(
                "   {}. {} - {} sold, {:.2}",
                i + 1,
                product.label,
                product.total_quantity,
                product.total_revenue
            );
        }
    }
    println!("════════════════════════════════════════════════════════════════");
}
