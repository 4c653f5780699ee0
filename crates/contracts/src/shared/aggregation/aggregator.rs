use crate::domain::a002_sale::Sale;
use crate::shared::period::{day_key, parse_day, DateRange};
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grouping key for a reduction over sales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Viewer-local calendar date of `sale_date`
    LocalDate,
    /// Embedded platform name, `Unknown` when missing
    Platform,
    /// Product name, `Unknown` when empty
    Product,
}

impl GroupBy {
    pub fn is_date(&self) -> bool {
        matches!(self, GroupBy::LocalDate)
    }
}

/// One group of sales: count and amount statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub key: String,
    pub count: u64,
    pub total: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateBucket {
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            count: 0,
            total: 0.0,
            min: None,
            max: None,
        }
    }

    fn push(&mut self, amount: f64) {
        self.count += 1;
        self.total += amount;
        self.min = Some(self.min.map_or(amount, |m| m.min(amount)));
        self.max = Some(self.max.map_or(amount, |m| m.max(amount)));
    }

    /// Mean amount, 0 for an empty bucket
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }

    /// Calendar date for date-keyed buckets
    pub fn day(&self) -> Option<NaiveDate> {
        parse_day(&self.key).ok()
    }
}

/// Daily series of a single platform (comparison chart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSeries {
    pub platform: String,
    pub buckets: Vec<AggregateBucket>,
}

/// In-memory reduction of fetched sale rows.
///
/// Date keys are computed in the viewer's zone `tz`. Output is a fresh
/// `Vec` on every call; nothing is cached between refreshes.
pub struct Aggregator<'a, Tz: TimeZone> {
    tz: &'a Tz,
}

impl<'a, Tz: TimeZone> Aggregator<'a, Tz> {
    pub fn new(tz: &'a Tz) -> Self {
        Self { tz }
    }

    fn key_of(&self, sale: &Sale, group_by: GroupBy) -> String {
        match group_by {
            GroupBy::LocalDate => day_key(sale.local_date(self.tz)),
            GroupBy::Platform => sale.platform_name().to_string(),
            GroupBy::Product => sale.product_label().to_string(),
        }
    }

    /// Buckets in first-seen order
    fn collect<'s, I>(&self, sales: I, group_by: GroupBy) -> Vec<AggregateBucket>
    where
        I: IntoIterator<Item = &'s Sale>,
    {
        let mut buckets: Vec<AggregateBucket> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for sale in sales {
            let key = self.key_of(sale, group_by);
            let pos = match index.get(&key) {
                Some(pos) => *pos,
                None => {
                    index.insert(key.clone(), buckets.len());
                    buckets.push(AggregateBucket::empty(key));
                    buckets.len() - 1
                }
            };
            buckets[pos].push(sale.amount);
        }
        buckets
    }

    /// Group and sort: dates ascending, entities by total descending
    /// (ties keep first-seen order).
    pub fn aggregate(&self, sales: &[Sale], group_by: GroupBy) -> Vec<AggregateBucket> {
        let mut buckets = self.collect(sales, group_by);
        if group_by.is_date() {
            buckets.sort_by(|a, b| a.key.cmp(&b.key));
        } else {
            buckets.sort_by(|a, b| {
                b.total
                    .partial_cmp(&a.total)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        buckets
    }

    /// Continuous daily series: exactly one bucket for every date of
    /// `range`, zero where there were no sales. Rows dated outside `range`
    /// are left out; see [`Aggregator::daily_split`].
    pub fn daily(&self, sales: &[Sale], range: &DateRange) -> Vec<AggregateBucket> {
        self.daily_split(sales, range).days
    }

    /// [`Aggregator::daily`] plus the buckets of rows dated outside `range`,
    /// so that `days` and `outside` together conserve the input totals.
    pub fn daily_split(&self, sales: &[Sale], range: &DateRange) -> DailySeries {
        let mut by_day: HashMap<String, AggregateBucket> = self
            .collect(sales, GroupBy::LocalDate)
            .into_iter()
            .map(|b| (b.key.clone(), b))
            .collect();

        let days: Vec<AggregateBucket> = range
            .days()
            .map(|day| {
                let key = day_key(day);
                by_day
                    .remove(&key)
                    .unwrap_or_else(|| AggregateBucket::empty(key))
            })
            .collect();

        let mut outside: Vec<AggregateBucket> = by_day.into_values().collect();
        outside.sort_by(|a, b| a.key.cmp(&b.key));
        DailySeries { days, outside }
    }

    /// One continuous daily series per platform.
    ///
    /// `platforms` fixes the series order and includes platforms without
    /// sales; names seen only in `sales` are appended in first-seen order.
    pub fn daily_by_platform(
        &self,
        sales: &[Sale],
        range: &DateRange,
        platforms: &[String],
    ) -> Vec<PlatformSeries> {
        let mut names: Vec<String> = platforms.to_vec();
        for sale in sales {
            let name = sale.platform_name();
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        names
            .into_iter()
            .map(|platform| {
                let rows: Vec<Sale> = sales
                    .iter()
                    .filter(|s| s.platform_name() == platform)
                    .cloned()
                    .collect();
                let buckets = self.daily(&rows, range);
                PlatformSeries { platform, buckets }
            })
            .collect()
    }
}

/// Daily buckets of a range, split from the days the range does not cover
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    /// One bucket per date of the range, ascending
    pub days: Vec<AggregateBucket>,
    /// Dates outside the range that had sales, ascending
    pub outside: Vec<AggregateBucket>,
}

/// Sum over every bucket (equals the sum over the input rows)
pub fn grand_total(buckets: &[AggregateBucket]) -> (u64, f64) {
    buckets
        .iter()
        .fold((0, 0.0), |(count, total), b| (count + b.count, total + b.total))
}
