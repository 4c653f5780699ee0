use crate::domain::a002_sale::Sale;
use crate::shared::period::{PeriodError, PeriodFilter, PeriodKind};
use crate::shared::store_query::{Collection, StoreQuery};
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const PAGE_SIZE_OPTIONS: [u64; 3] = [20, 50, 100];

/// Filters of the sales history table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Platform name; `None` = all platforms
    pub platform: Option<String>,
    /// `None` = whole history
    pub period: Option<PeriodKind>,
    /// Product name substring, matched case-insensitively
    pub search: String,
}

impl HistoryFilter {
    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.period.is_none() && self.search.trim().is_empty()
    }

    /// Build the page read.
    ///
    /// The period is resolved against `today` and turned into the UTC window
    /// of the viewer's local days; ordering is newest first.
    pub fn to_query<Tz: TimeZone>(
        &self,
        paging: &HistoryPaging,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<StoreQuery, PeriodError> {
        let mut query = StoreQuery::table(Collection::Sales).embed("platforms", &["name"]);

        if let Some(platform) = self.platform.as_deref().filter(|p| !p.is_empty()) {
            query = query.eq("platforms.name", platform);
        }

        if let Some(kind) = &self.period {
            let period = PeriodFilter::resolve(kind.clone(), today)?;
            query = query.within("sale_date", period.range.utc_bounds(tz));
        }

        let search = self.search.trim();
        if !search.is_empty() {
            query = query.ilike_contains("product_name", search);
        }

        Ok(query
            .order_by("sale_date", false)
            .paginate(paging.page, paging.page_size))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPaging {
    /// 1-based
    pub page: u64,
    pub page_size: u64,
}

impl Default for HistoryPaging {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl HistoryPaging {
    pub fn first(page_size: u64) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    pub fn prev(self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            ..self
        }
    }

    /// Pages needed for `total_count` rows; 0 when there are none
    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_count.div_ceil(self.page_size.max(1))
    }

    pub fn last(self, total_count: u64) -> Self {
        Self {
            page: self.total_pages(total_count).max(1),
            ..self
        }
    }

    pub fn has_next(&self, total_count: u64) -> bool {
        self.page < self.total_pages(total_count)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// One page of history rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub rows: Vec<Sale>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
}

impl HistoryPage {
    /// Sum of the amounts on this page
    pub fn page_amount(&self) -> f64 {
        self.rows.iter().map(|s| s.amount).sum()
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.page_size
    }

    /// 1-based number of the first row on this page (0 when empty)
    pub fn first_row(&self) -> u64 {
        if self.rows.is_empty() {
            0
        } else {
            self.offset() + 1
        }
    }

    pub fn last_row(&self) -> u64 {
        self.offset() + self.rows.len() as u64
    }

    pub fn paging(&self) -> HistoryPaging {
        HistoryPaging {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.last_row() < self.total_count
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_query_for_platform_period_and_search() {
        let filter = HistoryFilter {
            platform: Some("Pixup".to_string()),
            period: Some(PeriodKind::Today),
            search: " benchy ".to_string(),
        };
        let q = filter
            .to_query(&HistoryPaging::default(), today(), &Utc)
            .unwrap();
        assert_eq!(q.select_clause(), "*,platforms!inner(name)");
        let pairs = q.query_pairs();
        assert!(pairs.contains(&("platforms.name".to_string(), "eq.Pixup".to_string())));
        assert!(pairs.contains(&(
            "sale_date".to_string(),
            "gte.2024-06-15T00:00:00Z".to_string()
        )));
        assert!(pairs.contains(&(
            "sale_date".to_string(),
            "lt.2024-06-16T00:00:00Z".to_string()
        )));
        assert!(pairs.contains(&("product_name".to_string(), "ilike.*benchy*".to_string())));
        assert!(pairs.contains(&("order".to_string(), "sale_date.desc".to_string())));
    }

    #[test]
    fn test_all_history_has_no_date_filter() {
        let q = HistoryFilter::default()
            .to_query(&HistoryPaging::default(), today(), &Utc)
            .unwrap();
        assert_eq!(q.select_clause(), "*,platforms(name)");
        assert!(q.filters.is_empty());
        assert!(q.count_exact);
    }

    #[test]
    fn test_inverted_custom_period_is_rejected() {
        let filter = HistoryFilter {
            period: Some(PeriodKind::custom("2024-06-10", "2024-06-01")),
            ..Default::default()
        };
        assert!(matches!(
            filter.to_query(&HistoryPaging::default(), today(), &Utc),
            Err(PeriodError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_platform_and_today_filter_over_rows() {
        use crate::shared::aggregation::aggregator::tests::sale;

        let rows: Vec<serde_json::Value> = vec![
            sale(Some("Cults3D"), "Dragon", 10.0, "2024-06-15T09:00:00Z"),
            sale(Some("Pixup"), "Benchy", 5.0, "2024-06-15T10:00:00Z"),
            sale(Some("Cults3D"), "Dragon", 7.0, "2024-06-14T10:00:00Z"),
        ]
        .iter()
        .map(|s| serde_json::to_value(s).unwrap())
        .collect();

        let filter = HistoryFilter {
            platform: Some("Pixup".to_string()),
            period: Some(PeriodKind::Today),
            search: String::new(),
        };
        let result = filter
            .to_query(&HistoryPaging::default(), today(), &Utc)
            .unwrap()
            .evaluate(&rows)
            .map_rows(serde_json::from_value::<Sale>)
            .unwrap();
        assert_eq!(result.total, Some(1));
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].platform_name(), "Pixup");
        assert_eq!(result.rows[0].amount, 5.0);
    }

    #[test]
    fn test_page_counters() {
        let page = HistoryPage {
            rows: Vec::new(),
            total_count: 45,
            page: 3,
            page_size: 20,
        };
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.first_row(), 0);
        assert!(page.has_prev());
        assert_eq!(HistoryPaging::default().prev().page, 1);
        assert_eq!(HistoryPaging::default().next().page, 2);
    }

    #[test]
    fn test_paging_navigation_bounds() {
        let paging = HistoryPaging::first(20);
        assert_eq!(paging.total_pages(45), 3);
        assert_eq!(paging.total_pages(0), 0);
        assert!(paging.has_next(45));
        assert!(!paging.has_prev());

        let last = paging.last(45);
        assert_eq!(last.page, 3);
        assert!(!last.has_next(45));
        assert!(last.has_prev());

        assert_eq!(paging.last(0).page, 1);
        assert!(!paging.has_next(0));
        assert_eq!(HistoryPaging::first(0).page_size, 1);
    }
}
