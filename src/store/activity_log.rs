//! Activity log filtering and pagination.

use super::types::ActivityLogRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value the log screens use for "no filter".
pub const ALL: &str = "all";

/// Criteria applied to the activity log.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub log_type: Option<String>,
    pub operation_type: Option<String>,
    pub search: Option<String>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

impl LogFilter {
    /// Number of criteria that actually narrow the result.
    pub fn active_count(&self) -> usize {
        [
            selected(&self.log_type),
            selected(&self.operation_type),
            selected(&self.search),
        ]
        .iter()
        .filter(|c| c.is_some())
        .count()
    }

    pub fn matches(&self, log: &ActivityLogRecord) -> bool {
        if let Some(log_type) = selected(&self.log_type) {
            if log.log_type != log_type {
                return false;
            }
        }

        if let Some(operation) = selected(&self.operation_type) {
            if log.operation_type != operation {
                return false;
            }
        }

        if let Some(term) = selected(&self.search) {
            let term = term.to_lowercase();
            return [&log.message, &log.log_type, &log.operation_type]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
        }

        true
    }

    /// Matching logs, newest first. Logs without a timestamp go last.
    pub fn apply(&self, logs: &[ActivityLogRecord]) -> Vec<ActivityLogRecord> {
        let mut filtered: Vec<ActivityLogRecord> =
            logs.iter().filter(|log| self.matches(log)).cloned().collect();
        filtered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        filtered
    }
}

/// One page of filtered logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    pub items: Vec<ActivityLogRecord>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub active_filters: usize,
}

/// Slices `logs` into 1-based pages. `page` and `per_page` are clamped to at least 1.
pub fn paginate(logs: Vec<ActivityLogRecord>, page: usize, per_page: usize) -> LogPage {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = logs.len();
    let total_pages = total_items.div_ceil(per_page);

    let items = logs
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    LogPage {
        items,
        page,
        per_page,
        total_items,
        total_pages,
        active_filters: 0,
    }
}

/// Number of log entries per log type.
pub fn log_type_counts(logs: &[ActivityLogRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for log in logs {
        *counts.entry(log.log_type.clone()).or_insert(0) += 1;
    }
    counts
}
