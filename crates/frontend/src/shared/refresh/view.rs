use contracts::dashboards::d400_sales_overview::KpiSnapshot;
use contracts::domain::a002_sale::Sale;
use contracts::projections::p900_sales_history::HistoryPage;
use contracts::shared::aggregation::{AggregateBucket, ChartSeries};
use leptos::prelude::*;

pub const LOAD_ERROR: &str = "Errore nel caricamento dati";

/// What a widget shows right now
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState<T> {
    Loading,
    Ready(T),
    /// The read succeeded but matched nothing
    Empty,
    Failed(String),
}

impl<T> WidgetState<T> {
    pub fn ready_or_empty(value: T, is_empty: bool) -> Self {
        if is_empty {
            WidgetState::Empty
        } else {
            WidgetState::Ready(value)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            WidgetState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            WidgetState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Render target of the refresh steps
pub trait DashboardView {
    fn render_kpis(&self, state: WidgetState<KpiSnapshot>);
    fn render_trend(&self, state: WidgetState<ChartSeries>);
    fn render_top_platforms(&self, state: WidgetState<Vec<AggregateBucket>>);
    fn render_recent_sales(&self, state: WidgetState<Vec<Sale>>);
    fn render_history(&self, state: WidgetState<HistoryPage>);
}

/// Reactive view: one signal per widget, read by the page components
#[derive(Clone, Copy)]
pub struct DashboardSignals {
    pub kpis: RwSignal<WidgetState<KpiSnapshot>>,
    pub trend: RwSignal<WidgetState<ChartSeries>>,
    pub top_platforms: RwSignal<WidgetState<Vec<AggregateBucket>>>,
    pub recent_sales: RwSignal<WidgetState<Vec<Sale>>>,
    pub history: RwSignal<WidgetState<HistoryPage>>,
    /// Local time of the last completed `refresh_all`
    pub last_refresh: RwSignal<Option<String>>,
}

impl DashboardSignals {
    pub fn new() -> Self {
        Self {
            kpis: RwSignal::new(WidgetState::Loading),
            trend: RwSignal::new(WidgetState::Loading),
            top_platforms: RwSignal::new(WidgetState::Loading),
            recent_sales: RwSignal::new(WidgetState::Loading),
            history: RwSignal::new(WidgetState::Loading),
            last_refresh: RwSignal::new(None),
        }
    }
}

impl Default for DashboardSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView for DashboardSignals {
    fn render_kpis(&self, state: WidgetState<KpiSnapshot>) {
        self.kpis.set(state);
    }

    fn render_trend(&self, state: WidgetState<ChartSeries>) {
        self.trend.set(state);
    }

    fn render_top_platforms(&self, state: WidgetState<Vec<AggregateBucket>>) {
        self.top_platforms.set(state);
    }

    fn render_recent_sales(&self, state: WidgetState<Vec<Sale>>) {
        self.recent_sales.set(state);
    }

    fn render_history(&self, state: WidgetState<HistoryPage>) {
        self.history.set(state);
    }
}
