//! In-process data source.
//!
//! Serves collections from memory; a collection set to `None` behaves like
//! an unavailable service. Useful for embedding the dashboard without the
//! REST services and for tests.

use super::DataSource;
use crate::error::FetchError;
use crate::store::{
    ActivityLogRecord, CategoryRecord, DashboardInputs, OrderRecord, ProductRecord,
    ReservationRecord,
};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
struct Collections {
    orders: Option<Vec<OrderRecord>>,
    products: Option<Vec<ProductRecord>>,
    categories: Option<Vec<CategoryRecord>>,
    reservations: Option<Vec<ReservationRecord>>,
    logs: Option<Vec<ActivityLogRecord>>,
}

#[derive(Debug, Default)]
pub struct MemorySource {
    data: Mutex<Collections>,
}

fn serve<T: Clone>(collection: &'static str, data: &Option<Vec<T>>) -> Result<Vec<T>, FetchError> {
    data.clone().ok_or(FetchError::Status {
        collection,
        status: 503,
    })
}

impl MemorySource {
    /// Every collection available with the given contents.
    pub fn new(inputs: DashboardInputs) -> Self {
        let source = Self::default();
        source.replace(inputs);
        source
    }

    /// Every collection unavailable.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Replaces all collections, making each available.
    pub fn replace(&self, inputs: DashboardInputs) {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        *data = Collections {
            orders: Some(inputs.orders),
            products: Some(inputs.products),
            categories: Some(inputs.categories),
            reservations: Some(inputs.reservations),
            logs: Some(inputs.logs),
        };
    }

    /// Makes every collection unavailable.
    pub fn take_offline(&self) {
        *self.data.lock().unwrap_or_else(PoisonError::into_inner) = Collections::default();
    }

    pub fn set_orders(&self, orders: Option<Vec<OrderRecord>>) {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).orders = orders;
    }

    pub fn set_reservations(&self, reservations: Option<Vec<ReservationRecord>>) {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reservations = reservations;
    }

    pub fn set_logs(&self, logs: Option<Vec<ActivityLogRecord>>) {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).logs = logs;
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn orders(&self) -> Result<Vec<OrderRecord>, FetchError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        serve("orders", &data.orders)
    }

    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        serve("products", &data.products)
    }

    async fn categories(&self) -> Result<Vec<CategoryRecord>, FetchError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        serve("categories", &data.categories)
    }

    async fn reservations(&self) -> Result<Vec<ReservationRecord>, FetchError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        serve("reservations", &data.reservations)
    }

    async fn activity_logs(&self) -> Result<Vec<ActivityLogRecord>, FetchError> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        serve("logs", &data.logs)
    }
}
