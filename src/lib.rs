//! RestoDash library.
//!
//! Aggregates restaurant order, product, category, reservation and
//! activity-log collections into dashboard snapshots.

pub mod config;
pub mod error;
pub mod monitor;
pub mod server;
pub mod source;
pub mod store;
