//! Upstream collection fetchers.
//!
//! One [`DataSource`] call per collection. The refresher fans them out
//! concurrently and folds any error into an empty collection.

pub mod http;
pub mod memory;

pub use http::HttpDataSource;
pub use memory::MemorySource;

use crate::error::FetchError;
use crate::store::{
    ActivityLogRecord, CategoryRecord, OrderRecord, ProductRecord, ReservationRecord,
};
use async_trait::async_trait;

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn orders(&self) -> Result<Vec<OrderRecord>, FetchError>;

    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError>;

    async fn categories(&self) -> Result<Vec<CategoryRecord>, FetchError>;

    async fn reservations(&self) -> Result<Vec<ReservationRecord>, FetchError>;

    async fn activity_logs(&self) -> Result<Vec<ActivityLogRecord>, FetchError>;
}
