use super::aggregator::{AggregateBucket, GroupBy};
use crate::shared::period::short_label;
use serde::{Deserialize, Serialize};

/// Value plotted for a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Count,
    Average,
}

impl Metric {
    pub fn value(&self, bucket: &AggregateBucket) -> f64 {
        match self {
            Metric::Revenue => bucket.total,
            Metric::Count => bucket.count as f64,
            Metric::Average => bucket.avg(),
        }
    }

    /// `<select>` value
    pub fn token(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Count => "sales",
            Metric::Average => "avg",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "revenue" => Some(Metric::Revenue),
            "sales" => Some(Metric::Count),
            "avg" => Some(Metric::Average),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Revenue => "Fatturato",
            Metric::Count => "Numero vendite",
            Metric::Average => "Valore medio",
        }
    }

    /// Money metrics are formatted with a currency sign
    pub fn is_money(&self) -> bool {
        !matches!(self, Metric::Count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

impl ChartKind {
    pub fn token(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Doughnut => "doughnut",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "line" => Some(ChartKind::Line),
            "bar" => Some(ChartKind::Bar),
            "doughnut" => Some(ChartKind::Doughnut),
            _ => None,
        }
    }
}

/// Labels and values ready for the chart component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Declarative description of a chart widget: which reduction feeds it and
/// how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub metric: Metric,
    pub group_by: GroupBy,
    pub chart: ChartKind,
}

impl WidgetSpec {
    pub const SALES_TREND: WidgetSpec = WidgetSpec {
        id: "sales_trend",
        title: "Andamento vendite",
        metric: Metric::Revenue,
        group_by: GroupBy::LocalDate,
        chart: ChartKind::Line,
    };

    pub const REVENUE_DISTRIBUTION: WidgetSpec = WidgetSpec {
        id: "revenue_distribution",
        title: "Distribuzione fatturato",
        metric: Metric::Revenue,
        group_by: GroupBy::Platform,
        chart: ChartKind::Doughnut,
    };

    pub const SALES_DISTRIBUTION: WidgetSpec = WidgetSpec {
        id: "sales_distribution",
        title: "Distribuzione vendite",
        metric: Metric::Count,
        group_by: GroupBy::Platform,
        chart: ChartKind::Doughnut,
    };

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    /// Project buckets onto labels/values. Date keys become short labels.
    pub fn series(&self, buckets: &[AggregateBucket]) -> ChartSeries {
        self.named_series(self.metric.label(), buckets)
    }

    pub fn named_series(&self, label: &str, buckets: &[AggregateBucket]) -> ChartSeries {
        let labels = buckets
            .iter()
            .map(|b| match (self.group_by, b.day()) {
                (GroupBy::LocalDate, Some(day)) => short_label(day),
                _ => b.key.clone(),
            })
            .collect();
        let values = buckets.iter().map(|b| self.metric.value(b)).collect();
        ChartSeries {
            label: label.to_string(),
            labels,
            values,
        }
    }
}
