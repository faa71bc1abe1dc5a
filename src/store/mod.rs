//! Data model and aggregation module.
//!
//! Turns the raw upstream collections into dashboard snapshots and holds
//! the current one for delivery to subscribers. Everything here except
//! [`SnapshotStore`] is a pure function of its inputs.

pub mod activity_log;
pub mod aggregator;
pub mod assembler;
pub mod clock;
pub mod snapshot_store;
pub mod timestamp;
pub mod types;
pub mod window;

pub use activity_log::{LogFilter, LogPage};
pub use assembler::{assemble, AssembleOptions, DashboardInputs};
pub use clock::{Clock, FixedClock, SystemClock};
pub use snapshot_store::{SnapshotState, SnapshotStore};
pub use types::*;
