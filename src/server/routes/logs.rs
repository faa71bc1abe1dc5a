//! Activity log endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::server::state::AppState;
use crate::store::activity_log::{log_type_counts, paginate};
use crate::store::{LogFilter, LogPage};

const DEFAULT_PER_PAGE: usize = 20;

/// Query parameters. Kept flat because `serde(flatten)` breaks numeric
/// fields in query strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub log_type: Option<String>,
    pub operation_type: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl LogsQuery {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            log_type: self.log_type.clone(),
            operation_type: self.operation_type.clone(),
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    #[serde(flatten)]
    pub page: LogPage,

    /// Per-type counts over all logs of the cycle, ignoring the filter.
    pub type_counts: BTreeMap<String, usize>,
}

/// GET /api/logs?logType=&operationType=&search=&page=&perPage=
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> Json<LogsResponse> {
    let logs = state.store.current().logs;
    let filter = query.filter();

    let mut page = paginate(
        filter.apply(&logs),
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(DEFAULT_PER_PAGE),
    );
    page.active_filters = filter.active_count();

    Json(LogsResponse {
        page,
        type_counts: log_type_counts(&logs),
    })
}
