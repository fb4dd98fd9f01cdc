//! # Daily Report
//!
//! The day window, the per-sale read model and the topping usage counts.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  date (store-local) ──► DayWindow [00:00:00.000, 23:59:59.999] in UTC   │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  rose-db: sales in window, newest first, joined with product name and  │
//! │           the structured list of topping names                          │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  SaleSummary { product_name, toppings: ["Fresas", "Helado"], ... }      │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  DailyReport: total, count, topping usage (count desc)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage is counted over each sale's topping list, never over the joined
//! display text, so a topping whose name contains ", " still counts once.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, Sale};
use crate::MISSING_PRODUCT_NAME;

/// Separator used when a sale's toppings are shown as one line.
pub const TOPPING_SEPARATOR: &str = ", ";

// =============================================================================
// Day Window
// =============================================================================

/// Inclusive UTC bounds of one store-local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Local midnight to local 23:59:59.999 of `date` at `offset`.
    ///
    /// `None` when either bound falls outside chrono's representable range
    /// (dates at the very edge of `NaiveDate::MIN`/`MAX`).
    pub fn for_date(date: NaiveDate, offset: FixedOffset) -> Option<Self> {
        let local_midnight = date.and_time(NaiveTime::default());
        let utc_midnight =
            local_midnight.checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
        let start = Utc.from_utc_datetime(&utc_midnight);
        let end = start
            .checked_add_signed(Duration::days(1))?
            .checked_sub_signed(Duration::milliseconds(1))?;
        Some(DayWindow { start, end })
    }

    /// Like [`DayWindow::for_date`], failing with [`CoreError::DateOutOfRange`].
    pub fn try_for_date(date: NaiveDate, offset: FixedOffset) -> CoreResult<Self> {
        Self::for_date(date, offset).ok_or_else(|| CoreError::DateOutOfRange(date))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// The store-local calendar date of an instant.
pub fn local_date(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

// =============================================================================
// Sale Summary
// =============================================================================

/// One sale as listed on the POS "today" panel and in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleSummary {
    pub id: i64,
    pub product_name: String,
    pub toppings: Vec<String>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleSummary {
    /// Builds the summary from a sale and whatever the join resolved.
    ///
    /// A product that no longer resolves shows as "Producto no encontrado".
    pub fn from_parts(sale: &Sale, product_name: Option<String>, toppings: Vec<String>) -> Self {
        let product_name = product_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| MISSING_PRODUCT_NAME.to_string());
        SaleSummary {
            id: sale.id,
            product_name,
            toppings,
            total: sale.total(),
            payment_method: sale.payment_method,
            created_at: sale.created_at,
        }
    }

    /// Topping names on one line: `"Fresas, Helado"`.
    pub fn toppings_text(&self) -> String {
        self.toppings.join(TOPPING_SEPARATOR)
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// How many times a topping was sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ToppingUsage {
    pub name: String,
    pub count: u32,
}

/// Counts toppings across sales, most used first.
///
/// Ties keep the order in which names were first seen.
pub fn topping_usage(sales: &[SaleSummary]) -> Vec<ToppingUsage> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut usage: Vec<ToppingUsage> = Vec::new();

    for name in sales.iter().flat_map(|s| s.toppings.iter()) {
        match index.get(name.as_str()) {
            Some(&i) => usage[i].count += 1,
            None => {
                index.insert(name.as_str(), usage.len());
                usage.push(ToppingUsage {
                    name: name.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable: equal counts stay in first-seen order
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

/// A day's sales with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyReport {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total: Money,
    pub sale_count: usize,
    pub topping_usage: Vec<ToppingUsage>,
    pub sales: Vec<SaleSummary>,
}

impl DailyReport {
    pub fn build(date: NaiveDate, sales: Vec<SaleSummary>) -> Self {
        DailyReport {
            date,
            total: sales.iter().map(|s| s.total).sum(),
            sale_count: sales.len(),
            topping_usage: topping_usage(&sales),
            sales,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bogota() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn summary(id: i64, total: i64, toppings: &[&str]) -> SaleSummary {
        SaleSummary {
            id,
            product_name: "Fresas con crema".to_string(),
            toppings: toppings.iter().map(|t| t.to_string()).collect(),
            total: Money::from_units(total),
            payment_method: PaymentMethod::Efectivo,
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 15, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_day_window_is_local_midnight_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let window = DayWindow::for_date(date, bogota()).unwrap();

        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 19, 5, 0, 0).unwrap());
        assert_eq!(
            window.end,
            Utc.with_ymd_and_hms(2026, 10, 20, 4, 59, 59).unwrap() + Duration::milliseconds(999)
        );
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.end + Duration::milliseconds(1)));
    }

    #[test]
    fn test_day_window_at_calendar_edges() {
        assert!(DayWindow::for_date(NaiveDate::MAX, bogota()).is_none());
        assert!(DayWindow::for_date(NaiveDate::MIN, FixedOffset::east_opt(5 * 3600).unwrap()).is_none());

        let err = DayWindow::try_for_date(NaiveDate::MAX, bogota()).unwrap_err();
        assert!(matches!(err, CoreError::DateOutOfRange(d) if d == NaiveDate::MAX));

        let day_before = NaiveDate::MAX.pred_opt().unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        assert!(DayWindow::for_date(day_before, utc).is_some());
    }

    #[test]
    fn test_local_date_crosses_utc_midnight() {
        let late_evening_utc = Utc.with_ymd_and_hms(2026, 10, 20, 3, 30, 0).unwrap();
        assert_eq!(
            local_date(late_evening_utc, bogota()),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
    }

    #[test]
    fn test_missing_product_falls_back() {
        let sale = Sale {
            id: 9,
            product_id: 404,
            total: 5000,
            payment_method: PaymentMethod::Transferencia,
            created_at: Utc::now(),
        };
        let s = SaleSummary::from_parts(&sale, None, vec![]);
        assert_eq!(s.product_name, MISSING_PRODUCT_NAME);
        assert_eq!(s.toppings_text(), "");

        let s = SaleSummary::from_parts(&sale, Some("Malteadas".into()), vec!["Oreo".into(), "Mani".into()]);
        assert_eq!(s.product_name, "Malteadas");
        assert_eq!(s.toppings_text(), "Oreo, Mani");
    }

    #[test]
    fn test_topping_usage_counts_and_orders() {
        let sales = vec![
            summary(1, 5800, &["Fresas", "Helado"]),
            summary(2, 6500, &["Oreo", "Helado"]),
            summary(3, 5000, &[]),
            summary(4, 7000, &["Oreo", "Helado", "Fresas"]),
            summary(5, 5000, &["Mani"]),
        ];
        let usage = topping_usage(&sales);
        let flat: Vec<(&str, u32)> = usage.iter().map(|u| (u.name.as_str(), u.count)).collect();
        assert_eq!(flat, vec![("Helado", 3), ("Fresas", 2), ("Oreo", 2), ("Mani", 1)]);
    }

    #[test]
    fn test_names_with_separator_count_once() {
        let sales = vec![summary(1, 5000, &["Chocolate, blanco"])];
        let usage = topping_usage(&sales);
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].name, "Chocolate, blanco");
    }

    #[test]
    fn test_daily_report_totals() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report = DailyReport::build(date, vec![summary(1, 5800, &["Fresas"]), summary(2, 6500, &[])]);
        assert_eq!(report.total, Money::from_units(12300));
        assert_eq!(report.sale_count, 2);
        assert!(!report.is_empty());
        assert!(DailyReport::build(date, vec![]).is_empty());
    }
}
