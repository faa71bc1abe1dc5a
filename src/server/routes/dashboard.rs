//! Dashboard endpoints.
//!
//! Everything here reads the current snapshot; nothing is recomputed per
//! request except on `POST /api/dashboard/refresh`.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::server::state::AppState;
use crate::store::{DailyBucket, DashboardSnapshot, HourlyBucket, Kpi, RankedEntity, SnapshotState};

type SliceResult<T> = Result<Json<T>, StatusCode>;

fn current_snapshot(state: &AppState) -> Result<Arc<DashboardSnapshot>, StatusCode> {
    state.store.current().snapshot.ok_or(StatusCode::NOT_FOUND)
}

/// GET /api/dashboard - Current snapshot with freshness flags.
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<SnapshotState> {
    Json(state.store.current())
}

/// POST /api/dashboard/refresh - Runs a cycle now and returns its result.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<SnapshotState> {
    Json(state.refresher.refresh_now().await)
}

/// GET /api/dashboard/kpi
pub async fn get_kpi(State(state): State<Arc<AppState>>) -> SliceResult<Kpi> {
    Ok(Json(current_snapshot(&state)?.kpi.clone()))
}

/// GET /api/dashboard/hourly - 24 buckets for today.
pub async fn get_hourly(State(state): State<Arc<AppState>>) -> SliceResult<Vec<HourlyBucket>> {
    Ok(Json(current_snapshot(&state)?.hourly_orders.clone()))
}

/// GET /api/dashboard/daily - Revenue per day, oldest first.
pub async fn get_daily(State(state): State<Arc<AppState>>) -> SliceResult<Vec<DailyBucket>> {
    Ok(Json(current_snapshot(&state)?.daily_revenue.clone()))
}

/// GET /api/dashboard/top-products
pub async fn get_top_products(
    State(state): State<Arc<AppState>>,
) -> SliceResult<Vec<RankedEntity>> {
    Ok(Json(current_snapshot(&state)?.top_products.clone()))
}

/// GET /api/dashboard/categories
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> SliceResult<Vec<RankedEntity>> {
    Ok(Json(current_snapshot(&state)?.category_breakdown.clone()))
}
