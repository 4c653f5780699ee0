//! Reads behind the analytics page

use super::dto::{
    StatsGranularity, PLATFORM_STATS_LIMIT, PRODUCT_PERFORMANCE_LIMIT, TOP_PRODUCTS_LIMIT,
};
use crate::shared::period::{
    day_key, first_day_of_month, first_day_of_year, PeriodError, PeriodFilter, PeriodKind,
};
use crate::shared::store_query::{Collection, StoreQuery, SummaryView};
use chrono::{NaiveDate, TimeZone};

pub fn performance_query() -> StoreQuery {
    StoreQuery::table(Collection::View(SummaryView::PlatformPerformanceSummary))
        .order_by("total_revenue", false)
}

/// Stats rows of the current day, month or year for every platform
pub fn current_stats_query(granularity: StatsGranularity, today: NaiveDate) -> StoreQuery {
    let query = StoreQuery::table(Collection::View(granularity.view()));
    let column = granularity.period_column();
    match granularity {
        StatsGranularity::Daily => query.eq(column, day_key(today)),
        StatsGranularity::Monthly => query.gte(column, day_key(first_day_of_month(today))),
        StatsGranularity::Yearly => query.gte(column, day_key(first_day_of_year(today))),
    }
}

/// Latest rows of one stats tab
pub fn stats_tab_query(granularity: StatsGranularity) -> StoreQuery {
    StoreQuery::table(Collection::View(granularity.view()))
        .order_by(granularity.period_column(), false)
        .limit(PLATFORM_STATS_LIMIT)
}

pub fn top_products_query() -> StoreQuery {
    StoreQuery::table(Collection::View(SummaryView::TopProductsOverall))
        .order_by("total_revenue", false)
        .limit(TOP_PRODUCTS_LIMIT)
}

/// Products by platform; `platform_name = None` lists every platform
pub fn product_performance_query(platform_name: Option<&str>) -> StoreQuery {
    let mut query = StoreQuery::table(Collection::View(SummaryView::ProductPerformance))
        .order_by("total_revenue", false)
        .limit(PRODUCT_PERFORMANCE_LIMIT);
    if let Some(name) = platform_name.filter(|n| !n.is_empty()) {
        query = query.eq("platform_name", name);
    }
    query
}

/// Raw sales of the last `days` days for the comparison chart
pub fn comparison_query<Tz: TimeZone>(
    days: u32,
    today: NaiveDate,
    tz: &Tz,
) -> Result<(PeriodFilter, StoreQuery), PeriodError> {
    let period = PeriodFilter::resolve(PeriodKind::last_days(days), today)?;
    let query = StoreQuery::table(Collection::Sales)
        .embed("platforms", &["name"])
        .within("sale_date", period.range.utc_bounds(tz))
        .order_by("sale_date", true);
    Ok((period, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_current_stats_filters() {
        let pairs = current_stats_query(StatsGranularity::Monthly, today()).query_pairs();
        assert!(pairs.contains(&("month".to_string(), "gte.2024-06-01".to_string())));
        let pairs = current_stats_query(StatsGranularity::Daily, today()).query_pairs();
        assert!(pairs.contains(&("sale_day".to_string(), "eq.2024-06-15".to_string())));
    }

    #[test]
    fn test_product_performance_platform_filter() {
        let q = product_performance_query(Some("Pixup"));
        assert_eq!(q.collection.name(), "product_performance");
        assert_eq!(q.limit, Some(50));
        assert_eq!(q.filters.len(), 1);
        assert!(product_performance_query(None).filters.is_empty());
    }

    #[test]
    fn test_comparison_window() {
        let (period, q) = comparison_query(30, today(), &Utc).unwrap();
        assert_eq!(period.range.len_days(), 30);
        assert_eq!(q.filters.len(), 2);
        assert!(comparison_query(0, today(), &Utc).is_err());
    }
}
