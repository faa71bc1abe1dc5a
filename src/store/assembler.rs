//! Builds a [`DashboardSnapshot`] from one batch of fetched collections.

use super::aggregator::{
    category_breakdown, daily, growth, hourly, most_recent, peak_hours, status_distribution,
    top_products, total_value, DEFAULT_TOP_LIMIT, NO_LIMIT,
};
use super::types::{
    ActivityLogRecord, CategoryRecord, DashboardSnapshot, Kpi, OrderRecord, ProductRecord,
    ReservationRecord, ReservationStatus, Sources,
};
use super::window::{partition, DayWindow};
use crate::config::DashboardSettings;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Sizes of the lists in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    pub top_products: usize,
    pub top_categories: usize,
    pub daily_days: u32,
    pub recent_orders: usize,
    pub recent_logs: usize,
    pub peak_hours: usize,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            top_products: DEFAULT_TOP_LIMIT,
            top_categories: NO_LIMIT,
            daily_days: 7,
            recent_orders: 5,
            recent_logs: 7,
            peak_hours: 6,
        }
    }
}

impl From<&DashboardSettings> for AssembleOptions {
    fn from(settings: &DashboardSettings) -> Self {
        Self {
            top_products: settings.top_products,
            top_categories: settings.top_categories,
            daily_days: settings.daily_days,
            recent_orders: settings.recent_orders,
            recent_logs: settings.recent_logs,
            peak_hours: settings.peak_hours,
        }
    }
}

/// One batch of upstream collections. Failed fetches are empty here.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub orders: Vec<OrderRecord>,
    pub products: Vec<ProductRecord>,
    pub categories: Vec<CategoryRecord>,
    pub reservations: Vec<ReservationRecord>,
    pub logs: Vec<ActivityLogRecord>,
}

impl DashboardInputs {
    pub fn counts(&self) -> [usize; 5] {
        [
            self.orders.len(),
            self.products.len(),
            self.categories.len(),
            self.reservations.len(),
            self.logs.len(),
        ]
    }
}

/// Composes every derived metric into one snapshot.
///
/// `now` is local wall-clock time and drives all calendar windows;
/// `generated_at` is stamped on the result as-is. Empty inputs produce an
/// all-zero snapshot rather than an error.
pub fn assemble(
    inputs: &DashboardInputs,
    now: NaiveDateTime,
    generated_at: DateTime<Utc>,
    sources: Sources,
    options: &AssembleOptions,
) -> DashboardSnapshot {
    let orders = partition(&inputs.orders, now, options.daily_days);

    let today_orders = orders.today.len() as u64;
    let prior_orders = orders.yesterday.len() as u64;
    let today_revenue = total_value(orders.today.iter().copied());
    let prior_revenue = total_value(orders.yesterday.iter().copied());

    let average_order_value = if today_orders > 0 {
        today_revenue / today_orders as f64
    } else {
        0.0
    };

    let active_reservations = DayWindow::today(now)
        .select(&inputs.reservations)
        .into_iter()
        .filter(|r| r.status == ReservationStatus::Confirmed)
        .count() as u64;

    let pending_reservations = inputs
        .reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Pending)
        .count() as u64;

    let kpi = Kpi {
        today_orders,
        today_revenue,
        prior_orders,
        prior_revenue,
        total_orders: inputs.orders.len() as u64,
        total_revenue: total_value(&inputs.orders),
        order_growth: growth(today_orders as f64, prior_orders as f64),
        revenue_growth: growth(today_revenue, prior_revenue),
        average_order_value,
        active_reservations,
        pending_reservations,
        total_reservations: inputs.reservations.len() as u64,
    };

    DashboardSnapshot {
        kpi,
        top_products: top_products(&inputs.orders, &inputs.products, options.top_products),
        category_breakdown: category_breakdown(
            &inputs.orders,
            &inputs.products,
            &inputs.categories,
            options.top_categories,
        ),
        hourly_orders: hourly(orders.today.iter().copied()),
        daily_revenue: daily(orders.last_n_days.iter().copied(), now.date(), options.daily_days),
        peak_hours: peak_hours(&inputs.orders, now, options.peak_hours),
        order_status_distribution: status_distribution(&inputs.orders),
        recent_orders: most_recent(&inputs.orders, options.recent_orders),
        recent_logs: most_recent(&inputs.logs, options.recent_logs),
        sources,
        generated_at,
    }
}
