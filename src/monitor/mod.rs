//! Background refresh logic.
//!
//! This module drives the periodic and on-demand refresh cycles that keep
//! the dashboard snapshot current.

pub mod refresher;

pub use refresher::*;
