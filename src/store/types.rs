//! Data types for the dashboard.
//!
//! Upstream records mirror the JSON the restaurant services return
//! (camelCase, many optional fields). Derived types are what the
//! aggregation produces and the presentation layer consumes.

use super::timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Records that may carry a point in time.
pub trait Timestamped {
    /// Local wall-clock time of the record, `None` when unknown.
    fn timestamp(&self) -> Option<NaiveDateTime>;
}

/// Records that carry a monetary amount.
pub trait Valued {
    fn value(&self) -> f64;
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// === Upstream records ===

/// Lifecycle of an order, as reported by the orders service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Other => "OTHER",
        }
    }
}

/// A single product line inside an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub product_id: i64,

    /// Name captured at order time, if the service sends it.
    #[serde(default)]
    pub product_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,

    /// Unit price at order time. Absent prices count as zero.
    #[serde(default, alias = "unitPrice")]
    pub price_at_order: Option<f64>,
}

impl LineItem {
    /// `quantity × unit price`.
    pub fn revenue(&self) -> f64 {
        f64::from(self.quantity) * self.price_at_order.unwrap_or(0.0)
    }
}

/// An order as returned by the orders service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub order_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub total_amount: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,

    #[serde(default)]
    pub customer_address: Option<String>,

    /// Explicit status. Never inferred from the order's age.
    #[serde(default)]
    pub status: Option<OrderStatus>,

    #[serde(default, alias = "lineItems", deserialize_with = "null_as_default")]
    pub order_items: Vec<LineItem>,
}

impl Timestamped for OrderRecord {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.order_date
    }
}

impl Valued for OrderRecord {
    fn value(&self) -> f64 {
        self.total_amount.unwrap_or(0.0)
    }
}

/// Menu product reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default)]
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,

    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Menu category reference data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    #[serde(default)]
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    #[default]
    #[serde(other)]
    Other,
}

/// A table reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(
        default,
        alias = "dateTime",
        deserialize_with = "timestamp::deserialize_opt"
    )]
    pub reservation_date_time: Option<NaiveDateTime>,

    #[serde(default, alias = "partySize", deserialize_with = "null_as_default")]
    pub number_of_people: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ReservationStatus,
}

impl Timestamped for ReservationRecord {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.reservation_date_time
    }
}

/// An entry from the activity log service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogRecord {
    #[serde(default)]
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub timestamp: Option<NaiveDateTime>,

    /// e.g. "PRODUCT", "CATEGORY", "ORDER".
    #[serde(default, deserialize_with = "null_as_default")]
    pub log_type: String,

    /// e.g. "CREATE", "UPDATE", "DELETE".
    #[serde(default, deserialize_with = "null_as_default")]
    pub operation_type: String,
}

impl Timestamped for ActivityLogRecord {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }
}

// === Derived view-model ===

/// One row of a ranking (top products, category breakdown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntity {
    pub id: i64,
    pub label: String,
    pub total_quantity: u64,
    pub total_revenue: f64,

    /// Share of the grand total across all keys, before truncation.
    pub share_percent: f64,
}

/// Orders and revenue for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyBucket {
    pub hour: u32,
    /// "HH:00"
    pub label: String,
    pub orders: u64,
    pub revenue: f64,
}

/// Orders and revenue for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub orders: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHour {
    pub hour: u32,
    pub label: String,
    pub order_count: u64,
    pub is_current_hour: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusShare {
    pub status: String,
    pub count: u64,
    pub percentage: f64,
}

/// Headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub today_orders: u64,
    pub today_revenue: f64,

    /// Yesterday's order count.
    pub prior_orders: u64,

    /// Yesterday's revenue.
    pub prior_revenue: f64,

    pub total_orders: u64,
    pub total_revenue: f64,
    pub order_growth: f64,
    pub revenue_growth: f64,
    pub average_order_value: f64,

    /// Today's confirmed reservations.
    pub active_reservations: u64,
    pub pending_reservations: u64,
    pub total_reservations: u64,
}

/// Outcome of fetching one upstream collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SourceStatus {
    Ok { count: usize },
    Failed { error: String },
}

impl SourceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SourceStatus::Ok { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sources {
    pub orders: SourceStatus,
    pub products: SourceStatus,
    pub categories: SourceStatus,
    pub reservations: SourceStatus,
    pub logs: SourceStatus,
}

impl Sources {
    /// All five collections loaded from in-memory data.
    pub fn all_ok(counts: [usize; 5]) -> Self {
        let [orders, products, categories, reservations, logs] = counts;
        Self {
            orders: SourceStatus::Ok { count: orders },
            products: SourceStatus::Ok { count: products },
            categories: SourceStatus::Ok { count: categories },
            reservations: SourceStatus::Ok {
                count: reservations,
            },
            logs: SourceStatus::Ok { count: logs },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SourceStatus)> {
        [
            ("orders", &self.orders),
            ("products", &self.products),
            ("categories", &self.categories),
            ("reservations", &self.reservations),
            ("logs", &self.logs),
        ]
        .into_iter()
    }

    pub fn failed_count(&self) -> usize {
        self.iter().filter(|(_, status)| !status.is_ok()).count()
    }
}

/// One immutable dashboard view-model, produced by a single aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub kpi: Kpi,
    pub top_products: Vec<RankedEntity>,
    pub category_breakdown: Vec<RankedEntity>,

    /// Exactly 24 entries for today's orders.
    pub hourly_orders: Vec<HourlyBucket>,

    /// One entry per day, oldest first, ending today.
    pub daily_revenue: Vec<DailyBucket>,

    pub peak_hours: Vec<PeakHour>,
    pub order_status_distribution: Vec<StatusShare>,
    pub recent_orders: Vec<OrderRecord>,
    pub recent_logs: Vec<ActivityLogRecord>,
    pub sources: Sources,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialization() {
        let json = r#"{
            "id": 7,
            "orderDate": "2025-05-01T10:15:00",
            "totalAmount": 31.5,
            "customerName": "Ana",
            "customerAddress": "Str. Lunga 1",
            "orderItems": [
                {"productId": 1, "productName": "Pizza", "quantity": 2, "priceAtOrder": 12.5},
                {"productId": 2, "quantity": 1}
            ]
        }"#;

        let order: OrderRecord = serde_json::from_str(json).unwrap();

        assert_eq!(order.id, Some(7));
        assert!(order.order_date.is_some());
        assert_eq!(order.order_items.len(), 2);
        assert_eq!(order.order_items[0].revenue(), 25.0);
        assert_eq!(order.order_items[1].revenue(), 0.0);
        assert!(order.status.is_none());
    }

    #[test]
    fn test_order_with_nulls() {
        let json = r#"{"orderDate": null, "totalAmount": null, "customerName": null, "orderItems": null}"#;

        let order: OrderRecord = serde_json::from_str(json).unwrap();

        assert!(order.order_date.is_none());
        assert_eq!(order.value(), 0.0);
        assert!(order.customer_name.is_empty());
        assert!(order.order_items.is_empty());
    }

    #[test]
    fn test_status_enums() {
        let order: OrderRecord = serde_json::from_str(r#"{"status": "DELIVERED"}"#).unwrap();
        assert_eq!(order.status, Some(OrderStatus::Delivered));

        let odd: OrderRecord = serde_json::from_str(r#"{"status": "ON_HOLD"}"#).unwrap();
        assert_eq!(odd.status, Some(OrderStatus::Other));

        let reservation: ReservationRecord = serde_json::from_str(
            r#"{"id": 3, "reservationDateTime": "2025-05-01T19:00:00", "numberOfPeople": 4, "status": "CONFIRMED"}"#,
        )
        .unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.number_of_people, 4);

        let missing: ReservationRecord = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(missing.status, ReservationStatus::Other);
    }

    #[test]
    fn test_sources_failed_count() {
        let mut sources = Sources::all_ok([1, 2, 3, 4, 5]);
        assert_eq!(sources.failed_count(), 0);

        sources.reservations = SourceStatus::Failed {
            error: "timeout".to_string(),
        };
        assert_eq!(sources.failed_count(), 1);
    }

    #[test]
    fn test_snapshot_field_names_are_camel_case() {
        let json = serde_json::to_value(Kpi::default()).unwrap();
        assert!(json.get("todayRevenue").is_some());
        assert!(json.get("activeReservations").is_some());
    }
}
