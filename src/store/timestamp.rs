//! Lenient timestamp decoding for upstream payloads.
//!
//! Upstream services send either RFC 3339 instants, zone-less local
//! date-times, or Jackson's array form `[y, m, d, h, min, s, nanos]`.
//! Everything is normalised to local wall-clock time. Anything missing or
//! unparseable becomes `None` so the record drops out of time windows.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Serde adapter for `Option<NaiveDateTime>` fields.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    let parsed = raw.as_ref().and_then(parse_value);

    if parsed.is_none() {
        if let Some(value) = raw.filter(|v| !v.is_null()) {
            tracing::debug!(%value, "Ignoring unparseable timestamp");
        }
    }

    Ok(parsed)
}

/// Parses a JSON value into a local wall-clock timestamp.
pub fn parse_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_str(s),
        Value::Array(parts) => parse_parts(parts),
        _ => None,
    }
}

/// Parses a textual timestamp.
pub fn parse_str(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Local).naive_local());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_parts(parts: &[Value]) -> Option<NaiveDateTime> {
    let mut numbers = parts.iter().map(|p| p.as_i64());
    let mut next = |default: i64| numbers.next().flatten().unwrap_or(default);

    let year = i32::try_from(next(i64::MIN)).ok()?;
    let month = u32::try_from(next(-1)).ok()?;
    let day = u32::try_from(next(-1)).ok()?;
    let hour = u32::try_from(next(0)).ok()?;
    let minute = u32::try_from(next(0)).ok()?;
    let second = u32::try_from(next(0)).ok()?;
    let nanos = u32::try_from(next(0)).ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nanos)
}
