//! Statistics aggregation utilities.
//!
//! Pure functions over already-fetched collections: growth, rankings,
//! fixed-cardinality time series and the smaller derived lists.

use super::types::{
    CategoryRecord, DailyBucket, HourlyBucket, LineItem, OrderRecord, PeakHour, ProductRecord,
    RankedEntity, StatusShare, Timestamped, Valued,
};
use super::window::{days_before, DayWindow};
use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashMap;

/// Label used when a ranked id has no reference record.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Default number of entries kept by the rankings.
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// Ranking limit that keeps every group.
pub const NO_LIMIT: usize = 0;

/// Percentage change from `previous` to `current`.
///
/// A zero baseline yields `100` when there is new activity and `0`
/// otherwise. The result is neither rounded nor clamped.
pub fn growth(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    ((current - previous) / previous) * 100.0
}

/// `part / whole` as a percentage, `0` for an empty whole.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Sum of the order amounts.
pub fn total_value<'a, T, I>(records: I) -> f64
where
    T: Valued + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().map(Valued::value).sum()
}

#[derive(Debug)]
struct Tally {
    id: i64,
    quantity: u64,
    revenue: f64,
}

/// Groups line items by a dimension and ranks the groups by revenue.
///
/// `dimension` maps a line item to its group key; items it returns `None`
/// for are skipped. `label` resolves a key to a display name, falling back
/// to [`UNKNOWN_LABEL`]. Ties keep first-seen order. `share_percent` is
/// computed against the total of *all* groups, so a truncated list does
/// not have to sum to 100. A `limit` of [`NO_LIMIT`] keeps every group.
pub fn top_entities<D, L>(
    orders: &[OrderRecord],
    dimension: D,
    label: L,
    limit: usize,
) -> Vec<RankedEntity>
where
    D: Fn(&LineItem) -> Option<i64>,
    L: Fn(i64) -> Option<String>,
{
    let mut tallies: Vec<Tally> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for item in orders.iter().flat_map(|o| o.order_items.iter()) {
        let Some(key) = dimension(item) else {
            continue;
        };

        let slot = *index.entry(key).or_insert_with(|| {
            tallies.push(Tally {
                id: key,
                quantity: 0,
                revenue: 0.0,
            });
            tallies.len() - 1
        });

        let tally = &mut tallies[slot];
        tally.quantity += u64::from(item.quantity);
        tally.revenue += item.revenue();
    }

    let grand_total: f64 = tallies.iter().map(|t| t.revenue).sum();

    // `sort_by` is stable: equal revenues keep insertion order.
    tallies.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    if limit != NO_LIMIT {
        tallies.truncate(limit);
    }

    tallies
        .into_iter()
        .map(|t| RankedEntity {
            id: t.id,
            label: label(t.id).unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            total_quantity: t.quantity,
            total_revenue: t.revenue,
            share_percent: percent_of(t.revenue, grand_total),
        })
        .collect()
}

fn product_index(products: &[ProductRecord]) -> HashMap<i64, &ProductRecord> {
    let mut index = HashMap::with_capacity(products.len());
    for product in products {
        index.entry(product.id).or_insert(product);
    }
    index
}

/// Best-selling products by revenue.
pub fn top_products(
    orders: &[OrderRecord],
    products: &[ProductRecord],
    limit: usize,
) -> Vec<RankedEntity> {
    let index = product_index(products);

    top_entities(
        orders,
        |item| Some(item.product_id),
        |id| index.get(&id).map(|p| p.name.clone()),
        limit,
    )
}

/// Revenue per menu category, joined through the product list.
///
/// Items whose product is unknown or has no category are skipped.
pub fn category_breakdown(
    orders: &[OrderRecord],
    products: &[ProductRecord],
    categories: &[CategoryRecord],
    limit: usize,
) -> Vec<RankedEntity> {
    let index = product_index(products);
    let mut names: HashMap<i64, &str> = HashMap::with_capacity(categories.len());
    for category in categories {
        names.entry(category.id).or_insert(category.name.as_str());
    }

    top_entities(
        orders,
        |item| index.get(&item.product_id).and_then(|p| p.category_id),
        |id| names.get(&id).map(|name| name.to_string()),
        limit,
    )
}

pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Count and value per hour of day. Always returns 24 buckets, hour 0 first.
pub fn hourly<'a, T, I>(records: I) -> Vec<HourlyBucket>
where
    T: Timestamped + Valued + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket {
            hour,
            label: hour_label(hour),
            orders: 0,
            revenue: 0.0,
        })
        .collect();

    for record in records {
        let Some(at) = record.timestamp() else {
            continue;
        };
        let bucket = &mut buckets[at.hour() as usize];
        bucket.orders += 1;
        bucket.revenue += record.value();
    }

    buckets
}

/// Count and value per calendar day for the `days` days ending `today`.
///
/// Always returns `days` buckets (at least one), oldest first.
pub fn daily<'a, T, I>(records: I, today: NaiveDate, days: u32) -> Vec<DailyBucket>
where
    T: Timestamped + Valued + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let days = days.max(1);
    let first = days_before(today, days - 1);

    let mut buckets: Vec<DailyBucket> = (0..days)
        .filter_map(|offset| first.checked_add_days(Days::new(u64::from(offset))))
        .map(|date| DailyBucket {
            date,
            orders: 0,
            revenue: 0.0,
        })
        .collect();

    let window = DayWindow::days(first, today);

    for record in records {
        let Some(at) = record.timestamp().filter(|at| window.contains(*at)) else {
            continue;
        };
        let offset = (at.date() - first).num_days();
        if let Some(bucket) = usize::try_from(offset).ok().and_then(|i| buckets.get_mut(i)) {
            bucket.orders += 1;
            bucket.revenue += record.value();
        }
    }

    buckets
}

/// Busiest hours of day across all dated records, most orders first.
///
/// Hours without orders are left out; equal counts keep hour order.
pub fn peak_hours<'a, T, I>(records: I, now: NaiveDateTime, limit: usize) -> Vec<PeakHour>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts = [0u64; 24];
    for at in records.into_iter().filter_map(Timestamped::timestamp) {
        counts[at.hour() as usize] += 1;
    }

    let current_hour = now.hour();
    let mut peaks: Vec<PeakHour> = (0u32..24)
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(hour, order_count)| PeakHour {
            hour,
            label: hour_label(hour),
            order_count,
            is_current_hour: hour == current_hour,
        })
        .collect();

    peaks.sort_by(|a, b| b.order_count.cmp(&a.order_count));
    peaks.truncate(limit);
    peaks
}

/// Label for orders that carry no status.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Share of orders per explicit status, most frequent first.
pub fn status_distribution(orders: &[OrderRecord]) -> Vec<StatusShare> {
    let mut shares: Vec<StatusShare> = Vec::new();

    for order in orders {
        let status = order
            .status
            .map(|s| s.as_str())
            .unwrap_or(UNKNOWN_STATUS);

        match shares.iter_mut().find(|s| s.status == status) {
            Some(share) => share.count += 1,
            None => shares.push(StatusShare {
                status: status.to_string(),
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let total = orders.len() as f64;
    for share in &mut shares {
        share.percentage = percent_of(share.count as f64, total);
    }

    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// The `n` newest records; records without a timestamp come last.
pub fn most_recent<T: Timestamped + Clone>(records: &[T], n: usize) -> Vec<T> {
    let mut sorted: Vec<&T> = records.iter().collect();
    sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    sorted.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::OrderStatus;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn item(product_id: i64, quantity: u32, price: f64) -> LineItem {
        LineItem {
            product_id,
            quantity,
            price_at_order: Some(price),
            ..Default::default()
        }
    }

    fn order(date: Option<NaiveDateTime>, amount: f64, items: Vec<LineItem>) -> OrderRecord {
        OrderRecord {
            order_date: date,
            total_amount: Some(amount),
            order_items: items,
            ..Default::default()
        }
    }

    fn product(id: i64, name: &str, category_id: Option<i64>) -> ProductRecord {
        ProductRecord {
            id,
            name: name.to_string(),
            price: 0.0,
            category_id,
        }
    }

    #[test]
    fn test_growth_baseline() {
        assert_eq!(growth(0.0, 0.0), 0.0);
        assert_eq!(growth(5.0, 0.0), 100.0);
        assert_eq!(growth(0.0, 5.0), -100.0);
        assert_eq!(growth(150.0, 100.0), 50.0);
    }

    #[test]
    fn test_growth_is_not_clamped() {
        assert_eq!(growth(0.0, 100.0), -100.0);
        assert_eq!(growth(1000.0, 1.0), 99900.0);
    }

    #[test]
    fn test_share_uses_pre_truncation_total() {
        let revenues = [100.0, 50.0, 30.0, 20.0, 10.0, 5.0, 5.0];
        let orders: Vec<OrderRecord> = revenues
            .iter()
            .enumerate()
            .map(|(i, r)| order(None, *r, vec![item(i as i64 + 1, 1, *r)]))
            .collect();

        let top = top_products(&orders, &[], 5);

        assert_eq!(top.len(), 5);
        let share_sum: f64 = top.iter().map(|e| e.share_percent).sum();
        assert!((share_sum - 210.0 / 220.0 * 100.0).abs() < 1e-9);
        assert!((share_sum - 95.45).abs() < 0.01);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let orders = vec![
            order(None, 10.0, vec![item(3, 1, 10.0)]),
            order(None, 10.0, vec![item(1, 1, 10.0)]),
            order(None, 10.0, vec![item(2, 2, 5.0)]),
        ];

        for _ in 0..5 {
            let ids: Vec<i64> = top_products(&orders, &[], 5).iter().map(|e| e.id).collect();
            assert_eq!(ids, vec![3, 1, 2]);
        }
    }

    #[test]
    fn test_unknown_product_label() {
        let orders = vec![order(None, 8.0, vec![item(99, 2, 4.0)])];
        let products = vec![product(1, "Pizza", None)];

        let top = top_products(&orders, &products, 5);

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label, UNKNOWN_LABEL);
        assert_eq!(top[0].total_quantity, 2);
        assert_eq!(top[0].total_revenue, 8.0);
        assert_eq!(top[0].share_percent, 100.0);
    }

    #[test]
    fn test_top_entities_empty_and_zero_revenue() {
        assert!(top_products(&[], &[], 5).is_empty());

        let free = vec![OrderRecord {
            order_items: vec![LineItem {
                product_id: 1,
                quantity: 3,
                ..Default::default()
            }],
            ..Default::default()
        }];
        let top = top_products(&free, &[], 5);
        assert_eq!(top[0].total_revenue, 0.0);
        assert_eq!(top[0].share_percent, 0.0);
    }

    #[test]
    fn test_category_breakdown() {
        let products = vec![
            product(1, "Margherita", Some(10)),
            product(2, "Carbonara", Some(20)),
            product(3, "Diavola", Some(10)),
            product(4, "Mystery", None),
        ];
        let categories = vec![CategoryRecord {
            id: 10,
            name: "Pizza".to_string(),
        }];
        let orders = vec![order(
            None,
            0.0,
            vec![
                item(1, 1, 10.0),
                item(2, 1, 12.0),
                item(3, 2, 5.0),
                item(4, 1, 100.0),
                item(5, 1, 100.0),
            ],
        )];

        let breakdown = category_breakdown(&orders, &products, &categories, 10);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].label, "Pizza");
        assert_eq!(breakdown[0].total_revenue, 20.0);
        assert_eq!(breakdown[0].total_quantity, 3);
        assert_eq!(breakdown[1].label, UNKNOWN_LABEL);
        assert_eq!(breakdown[1].id, 20);
    }

    #[test]
    fn test_category_breakdown_without_limit_keeps_all() {
        let products: Vec<ProductRecord> = (1..=12)
            .map(|id| product(id, "Dish", Some(100 + id)))
            .collect();
        let categories: Vec<CategoryRecord> = (1..=12)
            .map(|id| CategoryRecord {
                id: 100 + id,
                name: format!("Category {id}"),
            })
            .collect();
        let orders = vec![order(
            None,
            0.0,
            (1..=12).map(|id| item(id, 1, id as f64)).collect(),
        )];

        let all = category_breakdown(&orders, &products, &categories, NO_LIMIT);
        assert_eq!(all.len(), 12);
        assert_eq!(all[0].label, "Category 12");
        let total_share: f64 = all.iter().map(|e| e.share_percent).sum();
        assert!((total_share - 100.0).abs() < 1e-9);

        let capped = category_breakdown(&orders, &products, &categories, 3);
        assert_eq!(capped.len(), 3);
    }

    #[test]
    fn test_hourly_zero_fill() {
        let empty: Vec<OrderRecord> = vec![];
        let buckets = hourly(&empty);

        assert_eq!(buckets.len(), 24);
        assert!(buckets.iter().all(|b| b.orders == 0 && b.revenue == 0.0));
        assert_eq!(buckets[0].label, "00:00");
        assert_eq!(buckets[23].label, "23:00");
    }

    #[test]
    fn test_hourly_counts() {
        let orders = vec![
            order(Some(at(10, 9)), 12.0, vec![]),
            order(Some(at(10, 9)), 8.0, vec![]),
            order(Some(at(10, 21)), 5.0, vec![]),
            order(None, 100.0, vec![]),
        ];

        let buckets = hourly(&orders);

        assert_eq!(buckets[9].orders, 2);
        assert_eq!(buckets[9].revenue, 20.0);
        assert_eq!(buckets[21].orders, 1);
        assert_eq!(buckets.iter().map(|b| b.orders).sum::<u64>(), 3);
    }

    #[test]
    fn test_daily_always_has_requested_days() {
        let today = at(10, 12).date();
        let orders = vec![
            order(Some(at(10, 9)), 10.0, vec![]),
            order(Some(at(8, 9)), 7.0, vec![]),
            order(Some(at(8, 23)), 3.0, vec![]),
            order(Some(at(1, 9)), 99.0, vec![]),
            order(Some(at(11, 0)), 99.0, vec![]),
        ];

        let buckets = daily(&orders, today, 7);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date, at(4, 0).date());
        assert_eq!(buckets[6].date, today);
        assert_eq!(buckets[4].orders, 2);
        assert_eq!(buckets[4].revenue, 10.0);
        assert_eq!(buckets[6].orders, 1);
        assert_eq!(buckets.iter().filter(|b| b.orders == 0).count(), 5);
    }

    #[test]
    fn test_peak_hours() {
        let orders = vec![
            order(Some(at(10, 13)), 0.0, vec![]),
            order(Some(at(9, 13)), 0.0, vec![]),
            order(Some(at(9, 19)), 0.0, vec![]),
            order(Some(at(8, 12)), 0.0, vec![]),
            order(None, 0.0, vec![]),
        ];

        let peaks = peak_hours(&orders, at(10, 19), 2);

        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0].hour, 13);
        assert_eq!(peaks[0].order_count, 2);
        // 12:00 and 19:00 tie; hour order decides
        assert_eq!(peaks[1].hour, 12);
        assert!(!peaks[1].is_current_hour);

        let all = peak_hours(&orders, at(10, 19), 6);
        assert!(all.iter().any(|p| p.hour == 19 && p.is_current_hour));
    }

    #[test]
    fn test_status_distribution_uses_explicit_field() {
        let mut delivered = order(Some(at(1, 1)), 0.0, vec![]);
        delivered.status = Some(OrderStatus::Delivered);
        let mut pending = order(Some(at(10, 1)), 0.0, vec![]);
        pending.status = Some(OrderStatus::Pending);
        let untagged = order(Some(at(1, 1)), 0.0, vec![]);

        let dist = status_distribution(&[delivered.clone(), delivered, pending, untagged]);

        assert_eq!(dist[0].status, "DELIVERED");
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[0].percentage, 50.0);
        assert!(dist.iter().any(|s| s.status == UNKNOWN_STATUS && s.count == 1));
        assert!(status_distribution(&[]).is_empty());
    }

    #[test]
    fn test_most_recent() {
        let orders = vec![
            order(None, 1.0, vec![]),
            order(Some(at(5, 1)), 2.0, vec![]),
            order(Some(at(9, 1)), 3.0, vec![]),
        ];

        let recent = most_recent(&orders, 2);
        assert_eq!(recent[0].total_amount, Some(3.0));
        assert_eq!(recent[1].total_amount, Some(2.0));

        let all = most_recent(&orders, 10);
        assert_eq!(all.len(), 3);
        assert!(all[2].order_date.is_none());
    }
}
