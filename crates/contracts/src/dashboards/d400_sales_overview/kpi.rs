use crate::domain::a002_sale::Sale;
use crate::shared::period::{first_day_of_month, first_day_of_year, DateRange};
use chrono::{Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Headline figures of the overview page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub today_count: u64,
    pub today_amount: f64,
    pub yesterday_count: u64,
    pub yesterday_amount: f64,
    pub month_amount: f64,
    pub year_amount: f64,
}

impl KpiSnapshot {
    /// Range to fetch so that every figure can be computed from one read:
    /// from the earlier of Jan 1 and yesterday, through today.
    pub fn query_range(today: NaiveDate) -> DateRange {
        let yesterday = today - Duration::days(1);
        DateRange {
            start: first_day_of_year(today).min(yesterday),
            end: today,
        }
    }

    /// Reduce sales (any order) using the viewer-local date of each row
    pub fn compute<Tz: TimeZone>(sales: &[Sale], today: NaiveDate, tz: &Tz) -> Self {
        let yesterday = today - Duration::days(1);
        let month_start = first_day_of_month(today);
        let year_start = first_day_of_year(today);

        let mut kpi = KpiSnapshot::default();
        for sale in sales {
            let day = sale.local_date(tz);
            if day > today {
                continue;
            }
            if day == today {
                kpi.today_count += 1;
                kpi.today_amount += sale.amount;
            } else if day == yesterday {
                kpi.yesterday_count += 1;
                kpi.yesterday_amount += sale.amount;
            }
            if day >= month_start {
                kpi.month_amount += sale.amount;
            }
            if day >= year_start {
                kpi.year_amount += sale.amount;
            }
        }
        kpi
    }

    /// Day-over-day change of today's amount, `None` when yesterday was empty
    pub fn day_over_day_percent(&self) -> Option<f64> {
        pct_change(self.today_amount, self.yesterday_amount)
    }
}

pub fn pct_change(cur: f64, prev: f64) -> Option<f64> {
    if prev.abs() < 0.01 {
        None
    } else {
        Some(((cur - prev) / prev.abs()) * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::aggregation::aggregator::tests::sale;
    use chrono::{FixedOffset, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_today_and_yesterday_figures() {
        let sales = vec![
            sale(Some("Cults3D"), "A", 10.0, "2024-06-15T09:00:00Z"),
            sale(Some("Pixup"), "B", 5.0, "2024-06-15T10:00:00Z"),
            sale(Some("Cults3D"), "A", 7.0, "2024-06-14T10:00:00Z"),
            sale(Some("CGTrader"), "C", 20.0, "2024-05-20T10:00:00Z"),
            sale(Some("CGTrader"), "C", 1.0, "2023-12-31T10:00:00Z"),
        ];
        let kpi = KpiSnapshot::compute(&sales, d(2024, 6, 15), &Utc);
        assert_eq!(kpi.today_count, 2);
        assert_eq!(kpi.today_amount, 15.0);
        assert_eq!(kpi.yesterday_count, 1);
        assert_eq!(kpi.yesterday_amount, 7.0);
        assert_eq!(kpi.month_amount, 22.0);
        assert_eq!(kpi.year_amount, 42.0);
        let change = kpi.day_over_day_percent().unwrap();
        assert!((change - 114.2857).abs() < 0.001);
    }

    #[test]
    fn test_late_evening_sale_counts_for_local_today() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let sales = vec![sale(Some("Pixup"), "B", 5.0, "2024-06-02T04:30:00Z")];
        let kpi = KpiSnapshot::compute(&sales, d(2024, 6, 1), &tz);
        assert_eq!(kpi.today_count, 1);
    }

    #[test]
    fn test_no_change_without_yesterday_sales() {
        let kpi = KpiSnapshot {
            today_amount: 10.0,
            ..Default::default()
        };
        assert_eq!(kpi.day_over_day_percent(), None);
    }

    #[test]
    fn test_query_range_covers_yesterday_on_new_year() {
        let range = KpiSnapshot::query_range(d(2025, 1, 1));
        assert_eq!(range.start, d(2024, 12, 31));
        let range = KpiSnapshot::query_range(d(2024, 6, 15));
        assert_eq!(range.start, d(2024, 1, 1));
    }
}
