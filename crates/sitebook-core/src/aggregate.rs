//! # Currency-Bucketed Aggregation
//!
//! Per-currency totals, counts and percentage shares for list pages and
//! dashboard cards.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Listing request                                      │
//! │                                                                         │
//! │  records (already fetched, immutable for the request)                  │
//! │       │                                                                 │
//! │       ├──► aggregate_by_currency ──────────► { USD: 2 / 30.00,          │
//! │       │                                       EUR: 1 /  5.00 }          │
//! │       │                                             │                   │
//! │       ├──► aggregate_by_category_and_currency       │                   │
//! │       │         │                                   │                   │
//! │       │         ▼                                   ▼                   │
//! │       │    [materials/USD 20.00] ──► percentage_of_currency_total      │
//! │       │                                   = 20 / 30 × 100 = 66.67     │
//! │       │                                             │                   │
//! │       │                                   round_for_display → 66.7     │
//! │       │                                                                 │
//! │       └──► within_days(7 / 30) ──► same aggregation, smaller input     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Amounts are never added across currencies.
//! - No validation happens here: zero and negative historical amounts are
//!   summed as stored.
//! - Empty input gives empty results, and a zero or missing currency total
//!   gives a `0.0` percentage. Nothing in this module returns an error.
//! - Percentages stay unrounded until [`round_for_display`].

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::currency::CurrencyCode;
use crate::money::Money;
use crate::types::MonetaryRecord;

// =============================================================================
// Monetary Trait
// =============================================================================

/// Anything the aggregator can bucket.
///
/// Implementors must hand out an already-normalized currency.
pub trait Monetary {
    fn amount(&self) -> Money;
    fn currency(&self) -> &CurrencyCode;
    fn category(&self) -> &str;
    fn occurred_on(&self) -> NaiveDate;
}

impl Monetary for MonetaryRecord {
    fn amount(&self) -> Money {
        self.amount
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn occurred_on(&self) -> NaiveDate {
        self.occurred_on
    }
}

impl<R: Monetary + ?Sized> Monetary for &R {
    fn amount(&self) -> Money {
        (**self).amount()
    }

    fn currency(&self) -> &CurrencyCode {
        (**self).currency()
    }

    fn category(&self) -> &str {
        (**self).category()
    }

    fn occurred_on(&self) -> NaiveDate {
        (**self).occurred_on()
    }
}

// =============================================================================
// Buckets
// =============================================================================

/// Count and running total for one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyBucket {
    pub count: u64,
    pub total: Money,
}

impl CurrencyBucket {
    fn push(&mut self, amount: Money) {
        self.count += 1;
        self.total += amount;
    }
}

/// Buckets keyed by currency. Order carries no meaning; use
/// [`sorted_by_total`] for display.
pub type CurrencyBuckets = BTreeMap<CurrencyCode, CurrencyBucket>;

/// One row of a category breakdown table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryBucket {
    pub category: String,
    pub currency: CurrencyCode,
    pub count: u64,
    pub total: Money,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Groups records by currency, summing amounts and counting rows.
///
/// ## Example
/// ```rust
/// use sitebook_core::aggregate::{aggregate_by_currency, CurrencyBuckets};
///
/// let empty: Vec<sitebook_core::MonetaryRecord> = Vec::new();
/// assert_eq!(aggregate_by_currency(&empty), CurrencyBuckets::new());
/// ```
pub fn aggregate_by_currency<R: Monetary>(records: &[R]) -> CurrencyBuckets {
    let mut buckets = CurrencyBuckets::new();
    for record in records {
        buckets
            .entry(record.currency().clone())
            .or_default()
            .push(record.amount());
    }
    buckets
}

/// Groups records by category, then currency.
///
/// Rows come back ordered by category, then total (largest first), then
/// currency code.
pub fn aggregate_by_category_and_currency<R: Monetary>(records: &[R]) -> Vec<CategoryBucket> {
    let mut grouped: BTreeMap<(&str, &CurrencyCode), CurrencyBucket> = BTreeMap::new();
    for record in records {
        grouped
            .entry((record.category(), record.currency()))
            .or_default()
            .push(record.amount());
    }

    let mut rows: Vec<CategoryBucket> = grouped
        .into_iter()
        .map(|((category, currency), bucket)| CategoryBucket {
            category: category.to_string(),
            currency: currency.clone(),
            count: bucket.count,
            total: bucket.total,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.currency.cmp(&b.currency))
    });
    rows
}

/// Share of `bucket_total` in the grand total of `currency`, in percent.
///
/// Returns `0.0` when the currency has no bucket or its total is zero.
/// The value is unrounded; see [`round_for_display`].
pub fn percentage_of_currency_total(
    bucket_total: Money,
    currency: &CurrencyCode,
    buckets: &CurrencyBuckets,
) -> f64 {
    buckets
        .get(currency)
        .map_or(0.0, |grand| Money::percent_of(bucket_total, grand.total))
}

/// Rounds a percentage to one decimal place for progress bars and tables.
pub fn round_for_display(percent: f64) -> f64 {
    if !percent.is_finite() {
        return 0.0;
    }
    (percent * 10.0).round() / 10.0
}

/// Buckets in display order: largest total first, ties by currency code.
pub fn sorted_by_total(buckets: &CurrencyBuckets) -> Vec<(CurrencyCode, CurrencyBucket)> {
    let mut rows: Vec<(CurrencyCode, CurrencyBucket)> = buckets
        .iter()
        .map(|(currency, bucket)| (currency.clone(), *bucket))
        .collect();
    rows.sort_by_key(|(currency, bucket)| (Reverse(bucket.total), currency.clone()));
    rows
}

// =============================================================================
// Time Windows
// =============================================================================

/// The rolling windows shown on dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    Last7Days,
    Last30Days,
}

impl Window {
    pub const fn days(&self) -> u64 {
        match self {
            Window::Last7Days => 7,
            Window::Last30Days => 30,
        }
    }
}

/// Records with `occurred_on >= today - days`.
pub fn within_days<R: Monetary>(records: &[R], today: NaiveDate, days: u64) -> Vec<&R> {
    let cutoff = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
    records
        .iter()
        .filter(|record| record.occurred_on() >= cutoff)
        .collect()
}

/// [`aggregate_by_currency`] over one rolling window.
pub fn aggregate_window<R: Monetary>(records: &[R], today: NaiveDate, window: Window) -> CurrencyBuckets {
    aggregate_by_currency(&within_days(records, today, window.days()))
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// A category breakdown row with its share of the currency total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryShare {
    pub category: String,
    pub currency: CurrencyCode,
    pub count: u64,
    pub total: Money,
    /// Rounded to one decimal place.
    pub percent_of_currency: f64,
}

/// Everything a list page's statistic cards and breakdown table need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    #[ts(as = "String")]
    pub as_of: NaiveDate,
    pub all_time: CurrencyBuckets,
    pub last_7_days: CurrencyBuckets,
    pub last_30_days: CurrencyBuckets,
    pub categories: Vec<CategoryShare>,
}

impl DashboardSummary {
    /// Builds the summary from one snapshot of records.
    pub fn build<R: Monetary>(records: &[R], today: NaiveDate) -> Self {
        let all_time = aggregate_by_currency(records);

        let categories = aggregate_by_category_and_currency(records)
            .into_iter()
            .map(|row| {
                let percent = percentage_of_currency_total(row.total, &row.currency, &all_time);
                CategoryShare {
                    percent_of_currency: round_for_display(percent),
                    category: row.category,
                    currency: row.currency,
                    count: row.count,
                    total: row.total,
                }
            })
            .collect();

        DashboardSummary {
            as_of: today,
            last_7_days: aggregate_window(records, today, Window::Last7Days),
            last_30_days: aggregate_window(records, today, Window::Last30Days),
            all_time,
            categories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all_time.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::types::RecordKind;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn record(cents: i64, currency: Option<&str>, category: &str, on: NaiveDate) -> MonetaryRecord {
        let now = Utc::now();
        MonetaryRecord {
            id: format!("rec-{}", on),
            tenant_id: "tenant".to_string(),
            code: "ABCEXP001".to_string(),
            kind: RecordKind::Expense,
            amount: Money::from_cents(cents),
            currency: CurrencyCode::normalize(currency),
            category: category.to_string(),
            description: None,
            occurred_on: on,
            created_at: now,
            updated_at: now,
        }
    }

    fn usd() -> CurrencyCode {
        CurrencyCode::usd()
    }

    fn eur() -> CurrencyCode {
        CurrencyCode::normalize(Some("EUR"))
    }

    #[test]
    fn test_aggregate_by_currency() {
        let records = vec![
            record(10, Some("USD"), "materials", day(1)),
            record(20, Some("USD"), "fuel", day(2)),
            record(5, Some("EUR"), "materials", day(3)),
        ];

        let buckets = aggregate_by_currency(&records);

        assert_eq!(buckets.len(), 2);
        assert_eq!(
            buckets[&usd()],
            CurrencyBucket { count: 2, total: Money::from_cents(30) }
        );
        assert_eq!(
            buckets[&eur()],
            CurrencyBucket { count: 1, total: Money::from_cents(5) }
        );
    }

    #[test]
    fn test_missing_currency_lands_in_usd_bucket() {
        let records = vec![
            record(700, None, "fuel", day(1)),
            record(300, Some("usd"), "fuel", day(1)),
        ];

        let buckets = aggregate_by_currency(&records);

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[&usd()].count, 2);
        assert_eq!(buckets[&usd()].total.cents(), 1000);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<MonetaryRecord> = Vec::new();
        assert!(aggregate_by_currency(&records).is_empty());
        assert!(aggregate_by_category_and_currency(&records).is_empty());
        assert!(DashboardSummary::build(&records, day(19)).is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let records = vec![
            record(1250, Some("GBP"), "tools", day(4)),
            record(990, None, "fuel", day(5)),
            record(1, Some("GBP"), "tools", day(6)),
        ];

        assert_eq!(aggregate_by_currency(&records), aggregate_by_currency(&records));
        assert_eq!(
            aggregate_by_category_and_currency(&records),
            aggregate_by_category_and_currency(&records)
        );
    }

    #[test]
    fn test_non_positive_amounts_are_summed_as_is() {
        let records = vec![
            record(1000, None, "materials", day(1)),
            record(-250, None, "materials", day(2)),
            record(0, None, "materials", day(3)),
        ];

        let bucket = aggregate_by_currency(&records)[&usd()];
        assert_eq!(bucket.count, 3);
        assert_eq!(bucket.total.cents(), 750);
    }

    #[test]
    fn test_oversized_stored_amounts_saturate() {
        let records = vec![
            record(i64::MAX, None, "materials", day(1)),
            record(i64::MAX, None, "materials", day(2)),
        ];

        let bucket = aggregate_by_currency(&records)[&usd()];
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.total, Money::from_cents(i64::MAX));

        let rows = aggregate_by_category_and_currency(&records);
        assert_eq!(rows[0].total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_category_breakdown_order() {
        let records = vec![
            record(100, Some("EUR"), "fuel", day(1)),
            record(500, Some("USD"), "fuel", day(1)),
            record(100, Some("GBP"), "fuel", day(1)),
            record(50, None, "equipment", day(2)),
            record(25, None, "equipment", day(3)),
        ];

        let rows = aggregate_by_category_and_currency(&records);
        let keys: Vec<(&str, &str, i64)> = rows
            .iter()
            .map(|r| (r.category.as_str(), r.currency.as_str(), r.total.cents()))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("equipment", "USD", 75),
                ("fuel", "USD", 500),
                ("fuel", "EUR", 100),
                ("fuel", "GBP", 100),
            ]
        );
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn test_percentage_guard_for_missing_currency() {
        let buckets = CurrencyBuckets::new();
        let pct = percentage_of_currency_total(Money::from_cents(500), &CurrencyCode::normalize(Some("JPY")), &buckets);
        assert_eq!(pct, 0.0);
        assert!(pct.is_finite());
    }

    #[test]
    fn test_percentage_guard_for_zero_total() {
        let records = vec![
            record(100, None, "fuel", day(1)),
            record(-100, None, "refund", day(1)),
        ];
        let buckets = aggregate_by_currency(&records);

        let pct = percentage_of_currency_total(Money::from_cents(100), &usd(), &buckets);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_percentage_stays_unrounded() {
        let records = vec![
            record(10, None, "a", day(1)),
            record(20, None, "b", day(1)),
        ];
        let buckets = aggregate_by_currency(&records);

        let pct = percentage_of_currency_total(Money::from_cents(10), &usd(), &buckets);
        assert!((pct - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(round_for_display(pct), 33.3);
        assert_eq!(round_for_display(200.0 / 3.0), 66.7);
        assert_eq!(round_for_display(f64::NAN), 0.0);
    }

    #[test]
    fn test_sorted_by_total_breaks_ties_by_code() {
        let records = vec![
            record(100, Some("GBP"), "x", day(1)),
            record(100, Some("EUR"), "x", day(1)),
            record(900, Some("USD"), "x", day(1)),
        ];

        let order: Vec<String> = sorted_by_total(&aggregate_by_currency(&records))
            .into_iter()
            .map(|(currency, _)| currency.to_string())
            .collect();

        assert_eq!(order, vec!["USD", "EUR", "GBP"]);
    }

    #[test]
    fn test_windows() {
        let today = day(19);
        let records = vec![
            record(100, None, "fuel", day(19)),
            record(200, None, "fuel", day(12)), // exactly 7 days back
            record(400, None, "fuel", day(11)),
            record(800, None, "fuel", NaiveDate::from_ymd_opt(2026, 9, 19).unwrap()),
            record(1600, None, "fuel", NaiveDate::from_ymd_opt(2026, 9, 18).unwrap()),
        ];

        assert_eq!(within_days(&records, today, 7).len(), 2);

        let week = aggregate_window(&records, today, Window::Last7Days);
        assert_eq!(week[&usd()].total.cents(), 300);

        let month = aggregate_window(&records, today, Window::Last30Days);
        assert_eq!(month[&usd()].count, 4);
        assert_eq!(month[&usd()].total.cents(), 1500);
    }

    #[test]
    fn test_dashboard_summary() {
        let today = day(19);
        let records = vec![
            record(2000, None, "materials", day(18)),
            record(1000, None, "fuel", day(1)),
            record(500, Some("EUR"), "materials", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
        ];

        let summary = DashboardSummary::build(&records, today);

        assert_eq!(summary.all_time[&usd()].total.cents(), 3000);
        assert_eq!(summary.last_7_days[&usd()].total.cents(), 2000);
        assert_eq!(summary.last_30_days[&usd()].count, 2);
        assert!(!summary.last_30_days.contains_key(&eur()));

        let materials_usd = summary
            .categories
            .iter()
            .find(|c| c.category == "materials" && c.currency == usd())
            .unwrap();
        assert_eq!(materials_usd.percent_of_currency, 66.7);

        let materials_eur = summary
            .categories
            .iter()
            .find(|c| c.currency == eur())
            .unwrap();
        assert_eq!(materials_eur.percent_of_currency, 100.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["all_time"]["USD"]["count"], 2);
    }
}
