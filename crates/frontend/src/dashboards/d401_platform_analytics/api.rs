use crate::shared::supabase::{fetch, fetch_all, SalesStore, StoreError};
use chrono::{NaiveDate, TimeZone};
use contracts::dashboards::d401_platform_analytics::query::{
    comparison_query, current_stats_query, performance_query, product_performance_query,
    stats_tab_query, top_products_query,
};
use contracts::dashboards::d401_platform_analytics::{
    PlatformPerformanceRow, PlatformStatsRow, PlatformSummaryRow, ProductPerformanceRow,
    StatsGranularity, TopProductRow,
};
use contracts::domain::a002_sale::Sale;
use contracts::shared::aggregation::{AggregateBucket, Aggregator, ChartSeries, Metric, WidgetSpec};

pub async fn load_performance<S>(store: &S) -> Result<Vec<PlatformPerformanceRow>, StoreError>
where
    S: SalesStore + ?Sized,
{
    Ok(fetch::<PlatformPerformanceRow, _>(store, &performance_query())
        .await?
        .rows)
}

/// Platforms table: totals joined with today's, this month's and this year's stats
pub async fn load_platform_summary<S>(
    store: &S,
    today: NaiveDate,
) -> Result<Vec<PlatformSummaryRow>, StoreError>
where
    S: SalesStore + ?Sized,
{
    let platforms = load_performance(store).await?;
    let current = |g: StatsGranularity| current_stats_query(g, today);
    let daily = fetch::<PlatformStatsRow, _>(store, &current(StatsGranularity::Daily)).await?;
    let monthly = fetch::<PlatformStatsRow, _>(store, &current(StatsGranularity::Monthly)).await?;
    let yearly = fetch::<PlatformStatsRow, _>(store, &current(StatsGranularity::Yearly)).await?;
    Ok(PlatformSummaryRow::build(
        &platforms,
        &daily.rows,
        &monthly.rows,
        &yearly.rows,
    ))
}

pub async fn load_stats_tab<S>(
    store: &S,
    granularity: StatsGranularity,
) -> Result<Vec<PlatformStatsRow>, StoreError>
where
    S: SalesStore + ?Sized,
{
    Ok(fetch::<PlatformStatsRow, _>(store, &stats_tab_query(granularity))
        .await?
        .rows)
}

pub async fn load_top_products<S>(store: &S) -> Result<Vec<TopProductRow>, StoreError>
where
    S: SalesStore + ?Sized,
{
    Ok(fetch::<TopProductRow, _>(store, &top_products_query())
        .await?
        .rows)
}

pub async fn load_product_performance<S>(
    store: &S,
    platform_name: Option<&str>,
) -> Result<Vec<ProductPerformanceRow>, StoreError>
where
    S: SalesStore + ?Sized,
{
    Ok(
        fetch::<ProductPerformanceRow, _>(store, &product_performance_query(platform_name))
            .await?
            .rows,
    )
}

/// One daily series per platform over the last `days` days.
///
/// Every name in `platforms` gets a series even without sales, so the
/// legend stays stable when switching timeframe.
pub async fn load_comparison<S, Tz>(
    store: &S,
    days: u32,
    metric: Metric,
    today: NaiveDate,
    tz: &Tz,
    platforms: &[String],
) -> Result<Vec<ChartSeries>, StoreError>
where
    S: SalesStore + ?Sized,
    Tz: TimeZone,
{
    let (period, query) = comparison_query(days, today, tz)?;
    let sales = fetch_all::<Sale, _>(store, &query).await?;
    let spec = WidgetSpec::SALES_TREND.with_metric(metric);
    Ok(Aggregator::new(tz)
        .daily_by_platform(&sales, &period.range, platforms)
        .iter()
        .map(|s| spec.named_series(&s.platform, &s.buckets))
        .collect())
}

/// Doughnut over the performance rows (revenue or number of sales)
pub fn distribution(rows: &[PlatformPerformanceRow], spec: WidgetSpec) -> ChartSeries {
    let buckets: Vec<AggregateBucket> = rows
        .iter()
        .map(|r| AggregateBucket {
            count: r.total_sales,
            total: r.total_revenue,
            ..AggregateBucket::empty(r.name.clone())
        })
        .collect();
    spec.series(&buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::refresh::testing::{noon, sale};
    use crate::shared::supabase::memory::MemoryStore;
    use chrono::{Duration, Utc};
    use contracts::shared::store_query::{Collection, SummaryView};
    use serde_json::json;

    const CULTS: &str = "6f1c1c8e-7a43-4d4c-9d1c-0d3f1f6b2a11";
    const PIXUP: &str = "0b7d0f38-6f0e-4a52-9e55-3f2b5d1b7c01";

    fn today() -> NaiveDate {
        noon().date_naive()
    }

    fn performance_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.set_rows(
            Collection::View(SummaryView::PlatformPerformanceSummary),
            vec![
                json!({"id": PIXUP, "name": "Pixup", "total_sales": 2, "total_revenue": 8.0, "unique_products": 1}),
                json!({"id": CULTS, "name": "Cults3D", "total_sales": 5, "total_revenue": 40.5, "unique_products": 3}),
            ],
        );
        store
    }

    #[tokio::test]
    async fn test_summary_uses_current_period_rows() {
        let store = performance_store();
        store.set_rows(
            Collection::View(SummaryView::PlatformStatsDaily),
            vec![
                json!({"platform_id": CULTS, "sale_day": "2024-06-15", "total_sales": 2, "total_amount": 12}),
                json!({"platform_id": CULTS, "sale_day": "2024-06-14", "total_sales": 9, "total_amount": 90}),
            ],
        );
        store.set_rows(
            Collection::View(SummaryView::PlatformStatsMonthly),
            vec![json!({"platform_id": PIXUP, "month": "2024-06-01", "total_sales": 2, "total_amount": 8})],
        );

        let rows = load_platform_summary(&store, today()).await.unwrap();
        assert_eq!(rows.len(), 2);
        let cults = rows.iter().find(|r| r.name == "Cults3D").unwrap();
        assert_eq!(cults.today.sales, 2);
        assert_eq!(cults.today.revenue, 12.0);
        let pixup = rows.iter().find(|r| r.name == "Pixup").unwrap();
        assert_eq!(pixup.month.sales, 2);
        assert_eq!(pixup.year.sales, 0);
        assert_eq!(store.reads.get(), 4);
    }

    #[tokio::test]
    async fn test_performance_sorted_by_revenue() {
        let rows = load_performance(&performance_store()).await.unwrap();
        assert_eq!(rows[0].name, "Cults3D");
        assert_eq!(rows[1].total_revenue, 8.0);
    }

    #[tokio::test]
    async fn test_product_performance_filter_by_platform() {
        let store = MemoryStore::new();
        store.set_rows(
            Collection::View(SummaryView::ProductPerformance),
            vec![
                json!({"product_name": "Dragon", "platform_name": "Cults3D", "times_sold": 3, "total_revenue": 30}),
                json!({"product_name": "Benchy", "platform_name": "Pixup", "times_sold": 1, "total_revenue": 2}),
            ],
        );
        let all = load_product_performance(&store, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let pixup = load_product_performance(&store, Some("Pixup")).await.unwrap();
        assert_eq!(pixup.len(), 1);
        assert_eq!(pixup[0].product_name.as_deref(), Some("Benchy"));
        assert!(load_product_performance(&store, Some("3DExport"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_comparison_has_one_series_per_platform() {
        let store = MemoryStore::new();
        store.push_sale(&sale("Cults3D", "Dragon", 10.0, noon()));
        store.push_sale(&sale("Cults3D", "Dragon", 6.0, noon() - Duration::days(1)));
        store.push_sale(&sale("Pixup", "Benchy", 3.0, noon() - Duration::days(40)));

        let names = vec!["Cults3D".to_string(), "Pixup".to_string()];
        let series = load_comparison(&store, 7, Metric::Revenue, today(), &Utc, &names)
            .await
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Cults3D");
        assert_eq!(series[0].values.len(), 7);
        assert_eq!(series[0].values[6], 10.0);
        assert_eq!(series[0].values[5], 6.0);
        assert!(series[1].values.iter().all(|v| *v == 0.0));

        let counts = load_comparison(&store, 90, Metric::Count, today(), &Utc, &names)
            .await
            .unwrap();
        assert_eq!(counts[1].values.iter().sum::<f64>(), 1.0);
    }

    #[tokio::test]
    async fn test_comparison_rejects_empty_window() {
        let store = MemoryStore::new();
        let err = load_comparison(&store, 0, Metric::Revenue, today(), &Utc, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
        assert_eq!(store.reads.get(), 0);
    }

    #[tokio::test]
    async fn test_distribution_from_performance() {
        let rows = load_performance(&performance_store()).await.unwrap();
        let revenue = distribution(&rows, WidgetSpec::REVENUE_DISTRIBUTION);
        assert_eq!(revenue.labels, vec!["Cults3D", "Pixup"]);
        assert_eq!(revenue.values, vec![40.5, 8.0]);
        let sales = distribution(&rows, WidgetSpec::SALES_DISTRIBUTION);
        assert_eq!(sales.values, vec![5.0, 2.0]);
    }
}
