//! HTTP server module for API and WebSocket endpoints.
//!
//! Provides a REST API over the current dashboard snapshot and a WebSocket
//! that pushes every new snapshot to frontends.

pub mod routes;
pub mod state;
pub mod ws;

use crate::server::routes::{config, dashboard, health, logs};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    // CORS layer for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Dashboard API
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/dashboard/refresh", post(dashboard::refresh))
        .route("/api/dashboard/kpi", get(dashboard::get_kpi))
        .route("/api/dashboard/hourly", get(dashboard::get_hourly))
        .route("/api/dashboard/daily", get(dashboard::get_daily))
        .route("/api/dashboard/top-products", get(dashboard::get_top_products))
        .route("/api/dashboard/categories", get(dashboard::get_categories))
        // Activity logs
        .route("/api/logs", get(logs::get_logs))
        // Config API
        .route("/api/config", get(config::get_config))
        // WebSocket
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Serves the API on `listener` until `shutdown` flips to `true`.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("HTTP server listening on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow_and_update() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("HTTP server shutting down");
        })
        .await
}
