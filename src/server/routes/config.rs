//! Configuration endpoint.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::config::Config;
use crate::server::state::AppState;

/// GET /api/config - Effective configuration with the bearer token masked.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Config> {
    Json(state.config.redacted())
}
