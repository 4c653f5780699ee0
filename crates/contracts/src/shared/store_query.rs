//! Store-agnostic read descriptor.
//!
//! A [`StoreQuery`] names a collection, filters, embedded relations, an
//! ordering and an optional page window. The PostgREST client renders it to
//! query-string pairs with [`StoreQuery::query_pairs`]; the in-memory store
//! used in tests runs the same descriptor with [`StoreQuery::evaluate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

use crate::shared::period::timestamp_value;

/// Precomputed views owned by the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryView {
    DailySalesByPlatform,
    PlatformStatsDaily,
    PlatformStatsMonthly,
    PlatformStatsYearly,
    PlatformPerformanceSummary,
    TopProductsOverall,
    ProductPerformance,
}

impl SummaryView {
    pub fn name(&self) -> &'static str {
        match self {
            SummaryView::DailySalesByPlatform => "daily_sales_by_platform",
            SummaryView::PlatformStatsDaily => "platform_stats_daily",
            SummaryView::PlatformStatsMonthly => "platform_stats_monthly",
            SummaryView::PlatformStatsYearly => "platform_stats_yearly",
            SummaryView::PlatformPerformanceSummary => "platform_performance_summary",
            SummaryView::TopProductsOverall => "top_products_overall",
            SummaryView::ProductPerformance => "product_performance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Sales,
    Platforms,
    View(SummaryView),
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Platforms => "platforms",
            Collection::View(view) => view.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Case-insensitive substring
    ILike,
}

impl FilterOp {
    pub fn operator(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::ILike => "ilike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Column name; `relation.column` filters on an embedded relation
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Relation name when the column is `relation.column`
    pub fn relation(&self) -> Option<&str> {
        self.column.split_once('.').map(|(rel, _)| rel)
    }

    /// Rendered right-hand side: `eq.Pixup`, `ilike.*dragon*`
    pub fn rendered_value(&self) -> String {
        match self.op {
            FilterOp::ILike => format!("ilike.*{}*", escape_like(&self.value)),
            op => format!("{}.{}", op.operator(), self.value),
        }
    }

    pub fn matches(&self, row: &Value) -> bool {
        let Some(field) = lookup(row, &self.column) else {
            return false;
        };
        if field.is_null() {
            return false;
        }
        if self.op == FilterOp::ILike {
            return field_text(field)
                .to_lowercase()
                .contains(&self.value.to_lowercase());
        }
        let ord = compare_field(field, &self.value);
        match self.op {
            FilterOp::Eq => ord == Ordering::Equal,
            FilterOp::Gt => ord == Ordering::Greater,
            FilterOp::Gte => ord != Ordering::Less,
            FilterOp::Lt => ord == Ordering::Less,
            FilterOp::Lte | FilterOp::ILike => ord != Ordering::Greater,
        }
    }
}

/// Search terms match as plain substrings: LIKE wildcards are escaped with
/// the default backslash escape. PostgREST rewrites every `*` into `%` before it
/// reaches the database, so a literal star can only be approximated by the
/// one-character wildcard.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            c => out.push(c),
        }
    }
    out
}

/// Embedded relation (`platforms(name)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub relation: String,
    pub columns: Vec<String>,
    /// Inner join: rows without the relation are dropped
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Offset/limit window of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Page numbers start at 1; page 0 is treated as page 1
    pub fn for_page(page: u64, size: u64) -> Self {
        Self {
            offset: page.max(1).saturating_sub(1) * size,
            limit: size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreQuery {
    pub collection: Collection,
    pub columns: Vec<String>,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u64>,
    pub window: Option<PageWindow>,
    /// Ask the store for the total row count of the filtered set
    pub count_exact: bool,
}

impl StoreQuery {
    pub fn table(collection: Collection) -> Self {
        Self {
            collection,
            columns: Vec::new(),
            embeds: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
            window: None,
            count_exact: false,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn embed(mut self, relation: &str, columns: &[&str]) -> Self {
        self.embeds.push(Embed {
            relation: relation.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            required: false,
        });
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::new(column, FilterOp::Eq, value.to_string()))
    }

    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::new(column, FilterOp::Gte, value.to_string()))
    }

    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::new(column, FilterOp::Lt, value.to_string()))
    }

    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::new(column, FilterOp::Lte, value.to_string()))
    }

    pub fn ilike_contains(self, column: &str, term: &str) -> Self {
        self.filter(Filter::new(column, FilterOp::ILike, term.trim()))
    }

    /// Half-open instant window `[from, to)` on a timestamp column
    pub fn within(self, column: &str, bounds: (DateTime<Utc>, DateTime<Utc>)) -> Self {
        let (from, to) = bounds;
        self.gte(column, timestamp_value(&from))
            .lt(column, timestamp_value(&to))
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Page window plus exact total count
    pub fn paginate(mut self, page: u64, size: u64) -> Self {
        self.window = Some(PageWindow::for_page(page, size));
        self.count_exact = true;
        self
    }

    /// An embed is an inner join when declared so or when a filter targets it
    pub fn requires_embed(&self, embed: &Embed) -> bool {
        embed.required
            || self
                .filters
                .iter()
                .any(|f| f.relation() == Some(embed.relation.as_str()))
    }

    /// `select` parameter: `*,platforms!inner(name)`
    pub fn select_clause(&self) -> String {
        let mut parts: Vec<String> = if self.columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.columns.clone()
        };
        for embed in &self.embeds {
            let join = if self.requires_embed(embed) { "!inner" } else { "" };
            parts.push(format!(
                "{}{}({})",
                embed.relation,
                join,
                embed.columns.join(",")
            ));
        }
        parts.join(",")
    }

    /// Unencoded query-string pairs in PostgREST syntax
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select_clause())];
        for filter in &self.filters {
            pairs.push((filter.column.clone(), filter.rendered_value()));
        }
        if let Some(order) = &self.order {
            let dir = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{}", order.column, dir)));
        }
        match self.window {
            Some(window) => {
                pairs.push(("offset".to_string(), window.offset.to_string()));
                pairs.push(("limit".to_string(), window.limit.to_string()));
            }
            None => {
                if let Some(limit) = self.limit {
                    pairs.push(("limit".to_string(), limit.to_string()));
                }
            }
        }
        pairs
    }

    /// Run the query over already-joined JSON rows
    pub fn evaluate(&self, rows: &[Value]) -> QueryResult<Value> {
        let mut matched: Vec<Value> = rows
            .iter()
            .filter(|row| {
                self.embeds
                    .iter()
                    .filter(|e| self.requires_embed(e))
                    .all(|e| row.get(&e.relation).is_some_and(|v| !v.is_null()))
            })
            .filter(|row| self.filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            matched.sort_by(|a, b| {
                let ord = compare_values(lookup(a, &order.column), lookup(b, &order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        let total = matched.len() as u64;
        let (offset, limit) = match (self.window, self.limit) {
            (Some(w), _) => (w.offset as usize, Some(w.limit as usize)),
            (None, Some(l)) => (0, Some(l as usize)),
            (None, None) => (0, None),
        };
        let page: Vec<Value> = matched
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        QueryResult {
            rows: page,
            total: self.count_exact.then_some(total),
            window: self.window,
        }
    }
}

/// Rows of one read, with the exact total when it was requested
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    pub rows: Vec<T>,
    pub total: Option<u64>,
    pub window: Option<PageWindow>,
}

impl<T> QueryResult<T> {
    pub fn has_next(&self) -> bool {
        match (self.total, self.window) {
            (Some(total), Some(window)) => window.offset + (self.rows.len() as u64) < total,
            _ => false,
        }
    }

    pub fn map_rows<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<QueryResult<U>, E> {
        let rows = self.rows.into_iter().map(f).collect::<Result<Vec<U>, E>>()?;
        Ok(QueryResult {
            rows,
            total: self.total,
            window: self.window,
        })
    }
}

fn lookup<'v>(row: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(row, |v, key| v.get(key))
}

fn field_text(field: &Value) -> String {
    match field {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numbers compare numerically, timestamps chronologically, the rest as text
fn compare_text(left: &str, right: &str) -> Ordering {
    if let (Ok(l), Ok(r)) = (left.parse::<f64>(), right.parse::<f64>()) {
        return l.partial_cmp(&r).unwrap_or(Ordering::Equal);
    }
    if let (Ok(l), Ok(r)) = (
        DateTime::parse_from_rfc3339(left),
        DateTime::parse_from_rfc3339(right),
    ) {
        return l.cmp(&r);
    }
    left.cmp(right)
}

fn compare_field(field: &Value, value: &str) -> Ordering {
    compare_text(&field_text(field), value)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (Some(a), Some(b)) => compare_text(&field_text(a), &field_text(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                let platform = if i % 2 == 0 { "Cults3D" } else { "Pixup" };
                json!({
                    "id": i,
                    "amount": 1.0 + i as f64,
                    "product_name": format!("Model {}", i),
                    "sale_date": format!("2024-06-01T{:02}:{:02}:00Z", i / 60, i % 60),
                    "platforms": { "name": platform }
                })
            })
            .collect()
    }

    #[test]
    fn test_select_clause_promotes_filtered_embed_to_inner() {
        let q = StoreQuery::table(Collection::Sales).embed("platforms", &["name"]);
        assert_eq!(q.select_clause(), "*,platforms(name)");

        let q = q.eq("platforms.name", "Pixup");
        assert_eq!(q.select_clause(), "*,platforms!inner(name)");
    }

    #[test]
    fn test_query_pairs() {
        let from = Utc.with_ymd_and_hms(2024, 5, 31, 22, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 6, 1, 22, 0, 0).unwrap();
        let q = StoreQuery::table(Collection::Sales)
            .embed("platforms", &["name"])
            .within("sale_date", (from, to))
            .ilike_contains("product_name", " dragon ")
            .order_by("sale_date", false)
            .paginate(2, 20);
        let pairs = q.query_pairs();
        let get = |k: &str| -> Vec<String> {
            pairs
                .iter()
                .filter(|(key, _)| key == k)
                .map(|(_, v)| v.clone())
                .collect()
        };
        assert_eq!(
            get("sale_date"),
            vec!["gte.2024-05-31T22:00:00Z", "lt.2024-06-01T22:00:00Z"]
        );
        assert_eq!(get("product_name"), vec!["ilike.*dragon*"]);
        assert_eq!(get("order"), vec!["sale_date.desc"]);
        assert_eq!(get("offset"), vec!["20"]);
        assert_eq!(get("limit"), vec!["20"]);
        assert!(q.count_exact);
    }

    #[test]
    fn test_pagination_over_45_rows() {
        let data = rows(45);
        let page2 = StoreQuery::table(Collection::Sales)
            .order_by("id", true)
            .paginate(2, 20)
            .evaluate(&data);
        assert_eq!(page2.total, Some(45));
        assert_eq!(page2.rows.len(), 20);
        assert_eq!(page2.rows[0]["id"], 20);
        assert_eq!(page2.rows[19]["id"], 39);
        assert!(page2.has_next());

        let page3 = StoreQuery::table(Collection::Sales)
            .order_by("id", true)
            .paginate(3, 20)
            .evaluate(&data);
        assert_eq!(page3.rows.len(), 5);
        assert!(!page3.has_next());
    }

    #[test]
    fn test_evaluate_filters_on_relation_and_pattern() {
        let data = rows(10);
        let result = StoreQuery::table(Collection::Sales)
            .embed("platforms", &["name"])
            .eq("platforms.name", "Pixup")
            .ilike_contains("product_name", "MODEL 3")
            .evaluate(&data);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["id"], 3);
        assert_eq!(result.total, None);
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let filter = |term: &str| {
            StoreQuery::table(Collection::Sales)
                .ilike_contains("product_name", term)
                .query_pairs()
                .into_iter()
                .find(|(k, _)| k == "product_name")
                .map(|(_, v)| v)
                .unwrap()
        };
        assert_eq!(filter("50%_off"), "ilike.*50\\%\\_off*");
        assert_eq!(filter(r"a\b"), r"ilike.*a\\b*");
        assert_eq!(filter("x*y"), "ilike.*x_y*");

        let data = vec![
            json!({"id": 1, "product_name": "Gear 50%_off"}),
            json!({"id": 2, "product_name": "Gear 500 off"}),
            json!({"id": 3, "product_name": "Gear 50xyoff"}),
        ];
        let result = StoreQuery::table(Collection::Sales)
            .ilike_contains("product_name", "50%_off")
            .evaluate(&data);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0]["id"], 1);
    }

    #[test]
    fn test_inner_join_drops_rows_without_relation() {
        let data = vec![
            json!({"id": 1, "platforms": {"name": "Cults3D"}}),
            json!({"id": 2, "platforms": null}),
        ];
        let mut q = StoreQuery::table(Collection::Sales).embed("platforms", &["name"]);
        assert_eq!(q.evaluate(&data).rows.len(), 2);
        q.embeds[0].required = true;
        assert_eq!(q.evaluate(&data).rows.len(), 1);
    }

    #[test]
    fn test_timestamp_comparison_ignores_offset_notation() {
        let f = Filter::new("sale_date", FilterOp::Gte, "2024-06-01T00:00:00Z");
        assert!(f.matches(&json!({"sale_date": "2024-06-01T00:00:00+00:00"})));
        assert!(!f.matches(&json!({"sale_date": "2024-05-31T23:59:59+00:00"})));
    }

    #[test]
    fn test_view_names() {
        assert_eq!(
            Collection::View(SummaryView::PlatformStatsMonthly).name(),
            "platform_stats_monthly"
        );
        assert_eq!(PageWindow::for_page(0, 20).offset, 0);
    }
}
