pub mod aggregator;
pub mod widget;

pub use aggregator::{AggregateBucket, Aggregator, DailySeries, GroupBy, PlatformSeries};
pub use widget::{ChartKind, ChartSeries, Metric, WidgetSpec};
