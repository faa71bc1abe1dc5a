//! Injectable time source.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Source of "now" for aggregation and snapshot timestamps.
pub trait Clock: Send + Sync {
    /// Current instant, used for `generated_at`.
    fn now(&self) -> DateTime<Utc>;

    /// Current local wall-clock time, used for calendar-day windows.
    fn local_now(&self) -> NaiveDateTime;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same moment. Local time is treated as UTC.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    local: NaiveDateTime,
}

impl FixedClock {
    pub fn at(local: NaiveDateTime) -> Self {
        Self { local }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.local.and_utc()
    }

    fn local_now(&self) -> NaiveDateTime {
        self.local
    }
}
