use super::sequencer::{Ticket, Widget};
use super::state::DashboardState;
use super::view::{DashboardView, WidgetState, LOAD_ERROR};
use crate::shared::notifications::{announce_new_sales, NotificationSink};
use crate::shared::supabase::{fetch, fetch_all, SalesStore};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use contracts::dashboards::d400_sales_overview::query::{
    kpi_query, recent_sales_query, today_query, trend_query,
};
use contracts::dashboards::d400_sales_overview::KpiSnapshot;
use contracts::domain::a002_sale::Sale;
use contracts::projections::p900_sales_history::HistoryPage;
use contracts::shared::aggregation::{Aggregator, GroupBy, WidgetSpec};
use contracts::shared::period::local_date;
use std::rc::Rc;

pub type Clock = Rc<dyn Fn() -> DateTime<Utc>>;

/// Runs the fetch → aggregate → render steps of every dashboard widget.
///
/// Steps are independent: each one catches its own failure and renders it
/// in its widget, so one broken read never blanks the rest of the page.
pub struct RefreshOrchestrator<S: ?Sized, V: ?Sized, N: ?Sized, Tz: TimeZone> {
    store: Rc<S>,
    view: Rc<V>,
    sink: Rc<N>,
    state: Rc<DashboardState>,
    tz: Tz,
    clock: Clock,
}

impl<S: ?Sized, V: ?Sized, N: ?Sized, Tz: TimeZone> Clone for RefreshOrchestrator<S, V, N, Tz> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            view: self.view.clone(),
            sink: self.sink.clone(),
            state: self.state.clone(),
            tz: self.tz.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<S, V, N, Tz> RefreshOrchestrator<S, V, N, Tz>
where
    S: SalesStore + ?Sized,
    V: DashboardView + ?Sized,
    N: NotificationSink + ?Sized,
    Tz: TimeZone,
{
    pub fn new(
        store: Rc<S>,
        view: Rc<V>,
        sink: Rc<N>,
        state: Rc<DashboardState>,
        tz: Tz,
        clock: Clock,
    ) -> Self {
        Self {
            store,
            view,
            sink,
            state,
            tz,
            clock,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Today in the viewer's time zone
    pub fn today(&self) -> NaiveDate {
        local_date(&self.now(), &self.tz)
    }

    fn is_stale(&self, ticket: &Ticket) -> bool {
        let stale = !self.state.sequencer.is_current(ticket);
        if stale {
            log::debug!(
                "Discarding stale {:?} result (request #{})",
                ticket.widget,
                ticket.seq
            );
        }
        stale
    }

    /// Every widget, overview and history
    pub async fn refresh_all(&self) {
        log::debug!("Refreshing dashboard");
        self.refresh_overview().await;
        self.refresh_history().await;
    }

    /// KPI cards, trend chart, top platforms and recent sales
    pub async fn refresh_overview(&self) {
        self.refresh_kpis().await;
        self.refresh_trend().await;
        self.refresh_top_platforms().await;
        self.refresh_recent_sales().await;
    }

    pub async fn refresh_kpis(&self) {
        let ticket = self.state.sequencer.begin(Widget::Kpis);
        self.view.render_kpis(WidgetState::Loading);

        let today = self.today();
        let query = kpi_query(&self.state.overview.borrow(), today, &self.tz);
        let result = fetch_all::<Sale, _>(&*self.store, &query).await;
        if self.is_stale(&ticket) {
            return;
        }

        match result {
            Ok(sales) => {
                let kpi = KpiSnapshot::compute(&sales, today, &self.tz);
                self.view.render_kpis(WidgetState::Ready(kpi.clone()));
                let increase = self.state.tracker.borrow_mut().observe(kpi.today_count);
                if let Some(count) = increase {
                    announce_new_sales(&*self.sink, self.state.settings.get(), count);
                }
            }
            Err(e) => {
                log::error!("Failed to load KPIs: {}", e);
                self.view.render_kpis(WidgetState::Failed(LOAD_ERROR.to_string()));
            }
        }
    }

    pub async fn refresh_trend(&self) {
        let ticket = self.state.sequencer.begin(Widget::Trend);
        self.view.render_trend(WidgetState::Loading);

        let (period, query) =
            match trend_query(&self.state.overview.borrow(), self.today(), &self.tz) {
                Ok(resolved) => resolved,
                Err(e) => {
                    log::warn!("Invalid trend period: {}", e);
                    self.view.render_trend(WidgetState::Failed(e.to_string()));
                    return;
                }
            };
        let result = fetch_all::<Sale, _>(&*self.store, &query).await;
        if self.is_stale(&ticket) {
            return;
        }

        match result {
            Ok(sales) => {
                let buckets = Aggregator::new(&self.tz).daily(&sales, &period.range);
                let series = WidgetSpec::SALES_TREND.series(&buckets);
                self.view.render_trend(WidgetState::Ready(series));
            }
            Err(e) => {
                log::error!("Failed to load sales trend: {}", e);
                self.view.render_trend(WidgetState::Failed(LOAD_ERROR.to_string()));
            }
        }
    }

    pub async fn refresh_top_platforms(&self) {
        let ticket = self.state.sequencer.begin(Widget::TopPlatforms);
        self.view.render_top_platforms(WidgetState::Loading);

        let query = today_query(&self.state.overview.borrow(), self.today(), &self.tz);
        let result = fetch_all::<Sale, _>(&*self.store, &query).await;
        if self.is_stale(&ticket) {
            return;
        }

        match result {
            Ok(sales) => {
                let buckets = Aggregator::new(&self.tz).aggregate(&sales, GroupBy::Platform);
                let empty = buckets.is_empty();
                self.view
                    .render_top_platforms(WidgetState::ready_or_empty(buckets, empty));
            }
            Err(e) => {
                log::error!("Failed to load top platforms: {}", e);
                self.view
                    .render_top_platforms(WidgetState::Failed(LOAD_ERROR.to_string()));
            }
        }
    }

    pub async fn refresh_recent_sales(&self) {
        let ticket = self.state.sequencer.begin(Widget::RecentSales);
        self.view.render_recent_sales(WidgetState::Loading);

        let query = recent_sales_query(&self.state.overview.borrow(), self.today(), &self.tz);
        let result = fetch::<Sale, _>(&*self.store, &query).await;
        if self.is_stale(&ticket) {
            return;
        }

        match result {
            Ok(result) => {
                let empty = result.rows.is_empty();
                self.view
                    .render_recent_sales(WidgetState::ready_or_empty(result.rows, empty));
            }
            Err(e) => {
                log::error!("Failed to load recent sales: {}", e);
                self.view
                    .render_recent_sales(WidgetState::Failed(LOAD_ERROR.to_string()));
            }
        }
    }

    pub async fn refresh_history(&self) {
        let ticket = self.state.sequencer.begin(Widget::History);
        self.view.render_history(WidgetState::Loading);

        let paging = self.state.paging.get();
        let query = match self
            .state
            .history
            .borrow()
            .to_query(&paging, self.today(), &self.tz)
        {
            Ok(query) => query,
            Err(e) => {
                log::warn!("Invalid history filter: {}", e);
                self.view.render_history(WidgetState::Failed(e.to_string()));
                return;
            }
        };
        let result = fetch::<Sale, _>(&*self.store, &query).await;
        if self.is_stale(&ticket) {
            return;
        }

        match result {
            Ok(result) => {
                let total_count = result.total.unwrap_or(result.rows.len() as u64);
                let page = HistoryPage {
                    rows: result.rows,
                    total_count,
                    page: paging.page,
                    page_size: paging.page_size,
                };
                let empty = page.rows.is_empty();
                self.view.render_history(WidgetState::ready_or_empty(page, empty));
            }
            Err(e) => {
                log::error!("Failed to load sales history: {}", e);
                self.view
                    .render_history(WidgetState::Failed(LOAD_ERROR.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::notifications::{Feedback, NotificationSettings, RecordingSink};
    use crate::shared::refresh::testing::{last, noon, sale, setup, RecordingView};
    use crate::shared::supabase::memory::MemoryStore;
    use chrono::{Duration, FixedOffset};
    use contracts::domain::a001_platform::{Platform, PlatformId};
    use contracts::domain::a002_sale::{Currency, NewSale};
    use contracts::projections::p900_sales_history::HistoryFilter;
    use contracts::shared::period::PeriodKind;
    use contracts::shared::store_query::Collection;
    use std::cell::Cell;

    fn scenario_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.push_sale(&sale("Cults3D", "Dragon", 10.0, noon() - Duration::hours(3)));
        store.push_sale(&sale("Pixup", "Benchy", 5.0, noon() - Duration::hours(2)));
        store.push_sale(&sale("Cults3D", "Dragon", 7.0, noon() - Duration::days(1)));
        store
    }

    #[tokio::test]
    async fn test_refresh_all_end_to_end() {
        let (orchestrator, _store, view, sink) = setup(scenario_store());
        orchestrator.refresh_all().await;

        let kpi = last(&view.kpis).ready().cloned().unwrap();
        assert_eq!(kpi.today_count, 2);
        assert_eq!(format!("{:.2}", kpi.today_amount), "15.00");
        assert_eq!(kpi.yesterday_amount, 7.0);

        let trend = last(&view.trend).ready().cloned().unwrap();
        assert_eq!(trend.values.len(), 7);
        assert_eq!(trend.values, vec![0.0, 0.0, 0.0, 0.0, 0.0, 7.0, 15.0]);

        let top = last(&view.top).ready().cloned().unwrap();
        assert_eq!(top[0].key, "Cults3D");
        assert_eq!(top[1].key, "Pixup");

        let recent = last(&view.recent).ready().cloned().unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].platform_name(), "Pixup");

        let history = last(&view.history).ready().cloned().unwrap();
        assert_eq!(history.total_count, 3);

        // baseline load: no feedback
        assert!(sink.take().is_empty());
    }

    #[tokio::test]
    async fn test_history_pagination_over_45_rows() {
        let store = MemoryStore::new();
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for i in 0..45 {
            store.push_sale(&sale("Pixup", &format!("Model {}", i), 1.0, start + Duration::hours(i)));
        }
        let (orchestrator, _store, view, _sink) = setup(store);

        orchestrator.state().set_page(2);
        orchestrator.refresh_history().await;
        let page = last(&view.history).ready().cloned().unwrap();
        assert_eq!(page.rows.len(), 20);
        assert_eq!(page.total_count, 45);
        assert_eq!((page.first_row(), page.last_row()), (21, 40));
        assert_eq!(page.rows[0].product_label(), "Model 24");
        assert!(page.has_next());

        orchestrator.state().set_page(3);
        orchestrator.refresh_history().await;
        let page = last(&view.history).ready().cloned().unwrap();
        assert_eq!(page.rows.len(), 5);
        assert!(!page.has_next());
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_history_platform_and_today_filter() {
        let (orchestrator, _store, view, _sink) = setup(scenario_store());
        orchestrator.state().set_history_filter(HistoryFilter {
            platform: Some("Pixup".to_string()),
            period: Some(PeriodKind::Today),
            search: String::new(),
        });
        orchestrator.refresh_history().await;

        let page = last(&view.history).ready().cloned().unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.rows[0].platform_name(), "Pixup");
        assert_eq!(format!("{:.2}", page.page_amount()), "5.00");
    }

    #[tokio::test]
    async fn test_no_match_renders_empty_state() {
        let (orchestrator, _store, view, _sink) = setup(scenario_store());
        orchestrator.state().set_history_filter(HistoryFilter {
            search: "castle".to_string(),
            ..Default::default()
        });
        orchestrator.refresh_history().await;
        assert_eq!(last(&view.history), WidgetState::Empty);
    }

    #[tokio::test]
    async fn test_inverted_custom_range_is_rejected_before_fetch() {
        let (orchestrator, store, view, _sink) = setup(scenario_store());
        orchestrator.state().set_history_filter(HistoryFilter {
            period: Some(PeriodKind::custom("2024-06-10", "2024-06-01")),
            ..Default::default()
        });
        orchestrator.refresh_history().await;
        assert!(last(&view.history).error().is_some());
        assert_eq!(store.reads.get(), 0);
    }

    #[tokio::test]
    async fn test_kpis_read_past_the_server_row_cap() {
        let store = MemoryStore::new();
        let march = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        for i in 0..1000 {
            store.push_sale(&sale("Pixup", "Benchy", 1.0, march + Duration::hours(i)));
        }
        for i in 0..200 {
            store.push_sale(&sale("Cults3D", "Dragon", 1.0, june + Duration::hours(i)));
        }
        store.cap_rows(1000);
        let (orchestrator, store, view, _sink) = setup(store);

        orchestrator.refresh_kpis().await;
        let kpi = last(&view.kpis).ready().cloned().unwrap();
        assert_eq!(kpi.year_amount, 1200.0);
        assert_eq!(kpi.month_amount, 200.0);
        assert_eq!(store.reads.get(), 2);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let (orchestrator, store, view, _sink) = setup(scenario_store());
        let sequencer = orchestrator.state().sequencer.clone();
        let fired = Rc::new(Cell::new(false));
        let fired_in_hook = fired.clone();
        store.on_select(move |_| {
            // a newer KPI request starts while the first one is in flight
            if !fired_in_hook.replace(true) {
                sequencer.begin(Widget::Kpis);
            }
        });

        orchestrator.refresh_kpis().await;
        assert!(fired.get());
        assert_eq!(view.kpis.borrow().len(), 1);
        assert!(last(&view.kpis).is_loading());
        assert_eq!(orchestrator.state().tracker.borrow().last_count(), 0);

        orchestrator.refresh_kpis().await;
        assert_eq!(last(&view.kpis).ready().map(|k| k.today_count), Some(2));
    }

    #[tokio::test]
    async fn test_failing_step_does_not_block_others() {
        let store = scenario_store();
        store.fail(Collection::Sales);
        let (orchestrator, store, view, _sink) = setup(store);
        orchestrator.refresh_all().await;

        assert_eq!(last(&view.kpis), WidgetState::Failed(LOAD_ERROR.to_string()));
        assert_eq!(last(&view.trend), WidgetState::Failed(LOAD_ERROR.to_string()));
        assert_eq!(last(&view.top), WidgetState::Failed(LOAD_ERROR.to_string()));
        assert_eq!(last(&view.recent), WidgetState::Failed(LOAD_ERROR.to_string()));
        assert_eq!(last(&view.history), WidgetState::Failed(LOAD_ERROR.to_string()));
        assert_eq!(store.reads.get(), 5);
    }

    #[tokio::test]
    async fn test_notifies_only_on_increase_after_first_load() {
        let pixup = Platform {
            id: PlatformId::new_v4(),
            name: "Pixup".to_string(),
            active: true,
        };
        let store = MemoryStore::with_platforms(vec![pixup.clone()]);
        store.push_sale(&sale("Pixup", "Benchy", 5.0, noon() - Duration::hours(1)));
        let (orchestrator, store, _view, sink) = setup(store);

        orchestrator.refresh_kpis().await;
        assert!(sink.take().is_empty());

        orchestrator.refresh_kpis().await;
        assert!(sink.take().is_empty());

        store
            .insert_sale(&NewSale {
                platform_id: pixup.id,
                product_name: "Dragon".to_string(),
                amount: 12.0,
                currency: Currency::Eur,
                sale_date: noon() - Duration::minutes(5),
            })
            .await
            .unwrap();
        orchestrator.refresh_kpis().await;
        let events = sink.take();
        assert!(events.contains(&Feedback::Sound));
        assert!(events.contains(&Feedback::Native(
            "Nuova Vendita!".to_string(),
            "Hai fatto 1 nuove vendite oggi!".to_string()
        )));
    }

    #[tokio::test]
    async fn test_bucketing_uses_viewer_time_zone() {
        // 23:30 local in UTC-5 is 04:30Z of the next day
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let store = Rc::new(MemoryStore::new());
        store.push_sale(&sale(
            "Pixup",
            "Benchy",
            5.0,
            Utc.with_ymd_and_hms(2024, 6, 2, 4, 30, 0).unwrap(),
        ));
        let view = Rc::new(RecordingView::default());
        let orchestrator = RefreshOrchestrator::new(
            store,
            view.clone(),
            Rc::new(RecordingSink::default()),
            Rc::new(DashboardState::new(5, 20, NotificationSettings::default())),
            tz,
            Rc::new(|| Utc.with_ymd_and_hms(2024, 6, 2, 15, 0, 0).unwrap()),
        );
        assert_eq!(orchestrator.today(), NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());

        orchestrator.refresh_trend().await;
        let trend = last(&view.trend).ready().cloned().unwrap();
        // last bucket is 2024-06-02 local; the sale belongs to 2024-06-01
        assert_eq!(trend.values[5], 5.0);
        assert_eq!(trend.values[6], 0.0);
    }
}
