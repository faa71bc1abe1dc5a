//! Calendar-day windows.
//!
//! Days start at 00:00:00.000 local time; "today" is never a rolling 24h
//! window ending at `now`. Records without a timestamp fall into no window.

use super::types::Timestamped;
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Midnight at the start of the given moment's day.
pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

/// Half-open interval `[start, end)` covering whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    /// Window covering a single calendar day.
    pub fn day(date: NaiveDate) -> Self {
        Self::days(date, date)
    }

    /// Window covering `first..=last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let end = last
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN);
        Self {
            start: first.and_time(NaiveTime::MIN),
            end,
        }
    }

    /// The calendar day containing `now`.
    pub fn today(now: NaiveDateTime) -> Self {
        Self::day(now.date())
    }

    /// The calendar day before `now`'s.
    pub fn yesterday(now: NaiveDateTime) -> Self {
        Self::day(days_before(now.date(), 1))
    }

    /// The `n` calendar days ending with today (`n == 0` is treated as 1).
    pub fn last_n_days(now: NaiveDateTime, n: u32) -> Self {
        let today = now.date();
        Self::days(days_before(today, n.max(1) - 1), today)
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }

    /// Records inside the window, in input order.
    pub fn select<'a, T: Timestamped>(&self, records: &'a [T]) -> Vec<&'a T> {
        records
            .iter()
            .filter(|r| r.timestamp().is_some_and(|at| self.contains(at)))
            .collect()
    }
}

pub(crate) fn days_before(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}

/// Records split into the standard dashboard windows.
#[derive(Debug)]
pub struct Partition<'a, T> {
    pub today: Vec<&'a T>,
    pub yesterday: Vec<&'a T>,
    pub last_n_days: Vec<&'a T>,
}

/// Splits records into today / yesterday / last `days` days relative to `now`.
pub fn partition<T: Timestamped>(records: &[T], now: NaiveDateTime, days: u32) -> Partition<'_, T> {
    Partition {
        today: DayWindow::today(now).select(records),
        yesterday: DayWindow::yesterday(now).select(records),
        last_n_days: DayWindow::last_n_days(now, days).select(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::OrderRecord;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn order(date: Option<NaiveDateTime>) -> OrderRecord {
        OrderRecord {
            order_date: date,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_of_day() {
        assert_eq!(start_of_day(at(10, 15, 45)), at(10, 0, 0));
    }

    #[test]
    fn test_today_uses_calendar_boundaries() {
        let now = at(10, 0, 30);
        let window = DayWindow::today(now);

        assert!(window.contains(at(10, 0, 0)));
        assert!(window.contains(at(10, 23, 59)));
        assert!(!window.contains(at(9, 23, 59)));
        assert!(!window.contains(at(11, 0, 0)));
    }

    #[test]
    fn test_yesterday_crosses_month() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let window = DayWindow::yesterday(now);

        assert_eq!(window.start.date(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
        assert_eq!(window.end, start_of_day(now));
    }

    #[test]
    fn test_partition() {
        let now = at(10, 12, 0);
        let orders = vec![
            order(Some(at(10, 9, 0))),
            order(Some(at(9, 22, 0))),
            order(Some(at(4, 10, 0))),
            order(Some(at(3, 23, 59))),
            order(None),
        ];

        let parts = partition(&orders, now, 7);

        assert_eq!(parts.today.len(), 1);
        assert_eq!(parts.yesterday.len(), 1);
        // 4th..=10th inclusive
        assert_eq!(parts.last_n_days.len(), 3);
    }

    #[test]
    fn test_missing_timestamp_is_never_today() {
        let orders = vec![order(None), order(None)];
        let parts = partition(&orders, at(10, 12, 0), 7);

        assert!(parts.today.is_empty());
        assert!(parts.yesterday.is_empty());
        assert!(parts.last_n_days.is_empty());
    }

    #[test]
    fn test_future_orders_today_still_count() {
        let orders = vec![order(Some(at(10, 23, 0)))];
        let parts = partition(&orders, at(10, 1, 0), 1);

        assert_eq!(parts.today.len(), 1);
        assert_eq!(parts.last_n_days.len(), 1);
    }
}
