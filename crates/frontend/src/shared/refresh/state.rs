use super::sequencer::RefreshSequencer;
use crate::shared::notifications::{NewSalesTracker, NotificationSettings};
use contracts::dashboards::d400_sales_overview::OverviewFilter;
use contracts::projections::p900_sales_history::{HistoryFilter, HistoryPaging};
use contracts::shared::period::PeriodKind;
use std::cell::{Cell, RefCell};

/// Everything the refresh steps read or update between runs.
///
/// Owned by the orchestrator and shared with the pages through it; nothing
/// here is persisted.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub overview: RefCell<OverviewFilter>,
    pub history: RefCell<HistoryFilter>,
    pub paging: Cell<HistoryPaging>,
    pub tracker: RefCell<NewSalesTracker>,
    pub settings: Cell<NotificationSettings>,
    pub sequencer: RefreshSequencer,
}

impl DashboardState {
    pub fn new(recent_limit: u64, page_size: u64, settings: NotificationSettings) -> Self {
        Self {
            overview: RefCell::new(OverviewFilter::default().with_recent_limit(recent_limit)),
            paging: Cell::new(HistoryPaging::first(page_size)),
            settings: Cell::new(settings),
            ..Default::default()
        }
    }

    /// Counts of another platform are not comparable with the old baseline
    pub fn set_platform(&self, platform_id: Option<String>) {
        let platform_id = platform_id.filter(|id| !id.is_empty());
        let mut overview = self.overview.borrow_mut();
        if overview.platform_id != platform_id {
            overview.platform_id = platform_id;
            self.tracker.borrow_mut().reset();
        }
    }

    pub fn set_trend_period(&self, period: PeriodKind) {
        self.overview.borrow_mut().trend_period = period;
    }

    pub fn set_recent_limit(&self, limit: u64) {
        let mut overview = self.overview.borrow_mut();
        *overview = overview.clone().with_recent_limit(limit);
    }

    /// New filters always start from the first page
    pub fn set_history_filter(&self, filter: HistoryFilter) {
        *self.history.borrow_mut() = filter;
        self.paging.set(HistoryPaging::first(self.paging.get().page_size));
    }

    pub fn set_page(&self, page: u64) {
        let paging = self.paging.get();
        self.paging.set(HistoryPaging {
            page: page.max(1),
            ..paging
        });
    }

    pub fn set_page_size(&self, page_size: u64) {
        self.paging.set(HistoryPaging::first(page_size));
    }

    pub fn set_paging(&self, paging: HistoryPaging) {
        self.paging.set(HistoryPaging {
            page: paging.page.max(1),
            page_size: paging.page_size.max(1),
        });
    }
}
