use crate::domain::a001_platform::PlatformId;
use crate::shared::store_query::SummaryView;
use serde::{Deserialize, Deserializer, Serialize};

/// Rows shown in the "top products" table
pub const TOP_PRODUCTS_LIMIT: u64 = 20;
/// Rows shown in the "products by platform" table
pub const PRODUCT_PERFORMANCE_LIMIT: u64 = 50;
/// Rows per tab in the platform stats panel
pub const PLATFORM_STATS_LIMIT: u64 = 10;
/// Timeframes (days) of the comparison chart
pub const COMPARISON_TIMEFRAMES: [u32; 3] = [7, 30, 90];

/// Numeric view columns may arrive as JSON numbers or strings
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Null(Option<()>),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(v) => Ok(v),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Null(_) => Ok(0.0),
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = lenient_f64(deserializer)?;
    Ok(if v.is_finite() && v > 0.0 { v.round() as u64 } else { 0 })
}

/// `platform_performance_summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPerformanceRow {
    pub id: PlatformId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_sales: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_sale_value: f64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub unique_products: u64,
}

/// Granularity of `platform_stats_*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatsGranularity {
    Daily,
    Monthly,
    Yearly,
}

impl StatsGranularity {
    pub fn all() -> [StatsGranularity; 3] {
        [
            StatsGranularity::Daily,
            StatsGranularity::Monthly,
            StatsGranularity::Yearly,
        ]
    }

    pub fn view(&self) -> SummaryView {
        match self {
            StatsGranularity::Daily => SummaryView::PlatformStatsDaily,
            StatsGranularity::Monthly => SummaryView::PlatformStatsMonthly,
            StatsGranularity::Yearly => SummaryView::PlatformStatsYearly,
        }
    }

    /// Column holding the period key
    pub fn period_column(&self) -> &'static str {
        match self {
            StatsGranularity::Daily => "sale_day",
            StatsGranularity::Monthly => "month",
            StatsGranularity::Yearly => "year",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatsGranularity::Daily => "Giornaliero",
            StatsGranularity::Monthly => "Mensile",
            StatsGranularity::Yearly => "Annuale",
        }
    }
}

/// `platform_stats_daily|monthly|yearly`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStatsRow {
    pub platform_id: PlatformId,
    #[serde(default)]
    pub platform_name: String,
    /// `sale_day`, `month` or `year` depending on the view
    #[serde(default, alias = "sale_day", alias = "month", alias = "year")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_sales: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub max_amount: f64,
}

impl PlatformStatsRow {
    /// Period key without the time part (`2024-06-01T00:00:00` -> `2024-06-01`)
    pub fn period_label(&self, granularity: StatsGranularity) -> String {
        let raw = self.period.as_deref().unwrap_or("");
        let date = raw.split('T').next().unwrap_or(raw);
        match granularity {
            StatsGranularity::Daily => date.to_string(),
            StatsGranularity::Monthly => date.get(..7).unwrap_or(date).to_string(),
            StatsGranularity::Yearly => date.get(..4).unwrap_or(date).to_string(),
        }
    }
}

/// `top_products_overall`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProductRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_sales: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_price: f64,
    /// Comma-separated platform names
    #[serde(default)]
    pub platforms: Option<String>,
}

/// `product_performance`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformanceRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub times_sold: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_price: f64,
    #[serde(default)]
    pub first_sale: Option<String>,
    #[serde(default)]
    pub last_sale: Option<String>,
}

/// Count and revenue of one platform in one period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodFigures {
    pub sales: u64,
    pub revenue: f64,
}

/// One line of the platforms summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformSummaryRow {
    pub platform_id: PlatformId,
    pub name: String,
    pub today: PeriodFigures,
    pub month: PeriodFigures,
    pub year: PeriodFigures,
    pub unique_products: u64,
}

impl PlatformSummaryRow {
    /// Join performance rows with the current day/month/year stats.
    ///
    /// Stats rows are expected to be already restricted to the current
    /// period; platforms without a row get zero figures.
    pub fn build(
        platforms: &[PlatformPerformanceRow],
        daily: &[PlatformStatsRow],
        monthly: &[PlatformStatsRow],
        yearly: &[PlatformStatsRow],
    ) -> Vec<PlatformSummaryRow> {
        let figures = |rows: &[PlatformStatsRow], id: PlatformId| {
            rows.iter()
                .filter(|r| r.platform_id == id)
                .fold(PeriodFigures::default(), |acc, r| PeriodFigures {
                    sales: acc.sales + r.total_sales,
                    revenue: acc.revenue + r.total_amount,
                })
        };
        platforms
            .iter()
            .map(|p| PlatformSummaryRow {
                platform_id: p.id,
                name: p.name.clone(),
                today: figures(daily, p.id),
                month: figures(monthly, p.id),
                year: figures(yearly, p.id),
                unique_products: p.unique_products,
            })
            .collect()
    }
}
