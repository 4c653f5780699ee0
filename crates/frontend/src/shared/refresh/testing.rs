//! Test doubles shared by the refresh and flow tests

use super::orchestrator::RefreshOrchestrator;
use super::state::DashboardState;
use super::view::{DashboardView, WidgetState};
use crate::shared::notifications::{NotificationSettings, RecordingSink};
use crate::shared::supabase::memory::MemoryStore;
use chrono::{DateTime, TimeZone, Utc};
use contracts::dashboards::d400_sales_overview::KpiSnapshot;
use contracts::domain::a001_platform::PlatformRef;
use contracts::domain::a002_sale::{Sale, SaleId};
use contracts::projections::p900_sales_history::HistoryPage;
use contracts::shared::aggregation::{AggregateBucket, ChartSeries};
use std::cell::RefCell;
use std::rc::Rc;

/// Keeps every state rendered into every widget
#[derive(Default)]
pub struct RecordingView {
    pub kpis: RefCell<Vec<WidgetState<KpiSnapshot>>>,
    pub trend: RefCell<Vec<WidgetState<ChartSeries>>>,
    pub top: RefCell<Vec<WidgetState<Vec<AggregateBucket>>>>,
    pub recent: RefCell<Vec<WidgetState<Vec<Sale>>>>,
    pub history: RefCell<Vec<WidgetState<HistoryPage>>>,
}

impl DashboardView for RecordingView {
    fn render_kpis(&self, state: WidgetState<KpiSnapshot>) {
        self.kpis.borrow_mut().push(state);
    }
    fn render_trend(&self, state: WidgetState<ChartSeries>) {
        self.trend.borrow_mut().push(state);
    }
    fn render_top_platforms(&self, state: WidgetState<Vec<AggregateBucket>>) {
        self.top.borrow_mut().push(state);
    }
    fn render_recent_sales(&self, state: WidgetState<Vec<Sale>>) {
        self.recent.borrow_mut().push(state);
    }
    fn render_history(&self, state: WidgetState<HistoryPage>) {
        self.history.borrow_mut().push(state);
    }
}

pub fn last<T: Clone>(cell: &RefCell<Vec<T>>) -> T {
    cell.borrow().last().cloned().expect("nothing rendered")
}

pub type TestOrchestrator = RefreshOrchestrator<MemoryStore, RecordingView, RecordingSink, Utc>;

/// Fixed clock: 2024-06-15 12:00 UTC
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn setup(
    store: MemoryStore,
) -> (
    TestOrchestrator,
    Rc<MemoryStore>,
    Rc<RecordingView>,
    Rc<RecordingSink>,
) {
    let store = Rc::new(store);
    let view = Rc::new(RecordingView::default());
    let sink = Rc::new(RecordingSink::default());
    let state = Rc::new(DashboardState::new(5, 20, NotificationSettings::default()));
    let orchestrator = RefreshOrchestrator::new(
        store.clone(),
        view.clone(),
        sink.clone(),
        state,
        Utc,
        Rc::new(noon),
    );
    (orchestrator, store, view, sink)
}

pub fn sale(platform: &str, product: &str, amount: f64, at: DateTime<Utc>) -> Sale {
    Sale {
        id: SaleId::new_v4(),
        platform_id: None,
        product_name: Some(product.to_string()),
        amount,
        currency: "EUR".to_string(),
        sale_date: at,
        platform: Some(PlatformRef {
            name: platform.to_string(),
        }),
    }
}
