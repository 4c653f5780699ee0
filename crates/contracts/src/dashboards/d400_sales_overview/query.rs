//! Reads behind the overview widgets

use super::dto::{clamp_recent_limit, OverviewFilter};
use super::kpi::KpiSnapshot;
use crate::shared::period::{DateRange, PeriodError, PeriodFilter};
use crate::shared::store_query::{Collection, StoreQuery};
use chrono::{NaiveDate, TimeZone};

fn sales_in<Tz: TimeZone>(filter: &OverviewFilter, range: &DateRange, tz: &Tz) -> StoreQuery {
    let mut query = StoreQuery::table(Collection::Sales)
        .embed("platforms", &["name"])
        .within("sale_date", range.utc_bounds(tz));
    if let Some(id) = filter.platform_id.as_deref().filter(|id| !id.is_empty()) {
        query = query.eq("platform_id", id);
    }
    query
}

/// Rows needed for [`KpiSnapshot::compute`]
pub fn kpi_query<Tz: TimeZone>(filter: &OverviewFilter, today: NaiveDate, tz: &Tz) -> StoreQuery {
    sales_in(filter, &KpiSnapshot::query_range(today), tz)
        .select(&["id", "platform_id", "amount", "sale_date"])
}

/// Today's sales for the top-platforms panel
pub fn today_query<Tz: TimeZone>(filter: &OverviewFilter, today: NaiveDate, tz: &Tz) -> StoreQuery {
    sales_in(filter, &DateRange::single(today), tz)
}

/// Newest sales of today, capped by the selected limit
pub fn recent_sales_query<Tz: TimeZone>(
    filter: &OverviewFilter,
    today: NaiveDate,
    tz: &Tz,
) -> StoreQuery {
    sales_in(filter, &DateRange::single(today), tz)
        .order_by("sale_date", false)
        .limit(clamp_recent_limit(filter.recent_limit))
}

/// Rows of the trend chart together with the resolved period
pub fn trend_query<Tz: TimeZone>(
    filter: &OverviewFilter,
    today: NaiveDate,
    tz: &Tz,
) -> Result<(PeriodFilter, StoreQuery), PeriodError> {
    let period = PeriodFilter::resolve(filter.trend_period.clone(), today)?;
    let query = sales_in(filter, &period.range, tz).order_by("sale_date", true);
    Ok((period, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a002_sale::Sale;
    use crate::shared::aggregation::aggregator::tests::sale;
    use crate::shared::aggregation::{Aggregator, WidgetSpec};
    use chrono::Utc;
    use serde_json::Value;

    fn rows() -> Vec<Value> {
        vec![
            sale(Some("Cults3D"), "Dragon", 10.0, "2024-06-15T09:00:00Z"),
            sale(Some("Pixup"), "Benchy", 5.0, "2024-06-15T10:00:00Z"),
            sale(Some("Cults3D"), "Dragon", 7.0, "2024-06-14T10:00:00Z"),
        ]
        .iter()
        .map(|s| serde_json::to_value(s).unwrap())
        .collect()
    }

    fn fetch(query: &StoreQuery) -> Vec<Sale> {
        query
            .evaluate(&rows())
            .map_rows(serde_json::from_value::<Sale>)
            .unwrap()
            .rows
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_overview_end_to_end() {
        let filter = OverviewFilter::default();

        let sales = fetch(&kpi_query(&filter, today(), &Utc));
        let kpi = KpiSnapshot::compute(&sales, today(), &Utc);
        assert_eq!(kpi.today_count, 2);
        assert_eq!(format!("{:.2}", kpi.today_amount), "15.00");

        let (period, query) = trend_query(&filter, today(), &Utc).unwrap();
        let buckets = Aggregator::new(&Utc).daily(&fetch(&query), &period.range);
        let series = WidgetSpec::SALES_TREND.series(&buckets);
        assert_eq!(series.values, vec![0.0, 0.0, 0.0, 0.0, 0.0, 7.0, 15.0]);
    }

    #[test]
    fn test_recent_sales_newest_first_with_limit() {
        let filter = OverviewFilter::default().with_recent_limit(1);
        let recent = fetch(&recent_sales_query(&filter, today(), &Utc));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].platform_name(), "Pixup");
    }

    #[test]
    fn test_platform_filter_uses_platform_id() {
        let filter = OverviewFilter {
            platform_id: Some("6f1c1c8e-7a43-4d4c-9d1c-0d3f1f6b2a11".to_string()),
            ..Default::default()
        };
        let q = today_query(&filter, today(), &Utc);
        let expected = (
            "platform_id".to_string(),
            "eq.6f1c1c8e-7a43-4d4c-9d1c-0d3f1f6b2a11".to_string(),
        );
        assert!(q.query_pairs().contains(&expected));
        assert_eq!(q.select_clause(), "*,platforms(name)");
    }
}
