use super::orchestrator::RefreshOrchestrator;
use super::view::DashboardSignals;
use crate::shared::notifications::BrowserSink;
use crate::shared::supabase::SupabaseClient;
use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

pub type AppOrchestrator = RefreshOrchestrator<SupabaseClient, DashboardSignals, BrowserSink, Local>;

/// Copyable access to the app orchestrator for components and callbacks
#[derive(Clone, Copy)]
pub struct RefreshHandle {
    inner: StoredValue<Rc<AppOrchestrator>, LocalStorage>,
    pub signals: DashboardSignals,
}

impl RefreshHandle {
    pub fn new(orchestrator: AppOrchestrator, signals: DashboardSignals) -> Self {
        Self {
            inner: StoredValue::new_local(Rc::new(orchestrator)),
            signals,
        }
    }

    pub fn get(&self) -> Rc<AppOrchestrator> {
        self.inner.get_value()
    }

    pub fn refresh_all(&self) {
        let orchestrator = self.get();
        let this = *self;
        spawn_local(async move {
            orchestrator.refresh_all().await;
            this.mark_refreshed();
        });
    }

    /// Stamp the header's "last update" time after a full refresh
    pub fn mark_refreshed(&self) {
        self.signals
            .last_refresh
            .set(Some(Local::now().format("%H:%M").to_string()));
    }

    pub fn refresh_overview(&self) {
        let orchestrator = self.get();
        spawn_local(async move { orchestrator.refresh_overview().await });
    }

    pub fn refresh_history(&self) {
        let orchestrator = self.get();
        spawn_local(async move { orchestrator.refresh_history().await });
    }

    pub fn refresh_trend(&self) {
        let orchestrator = self.get();
        spawn_local(async move { orchestrator.refresh_trend().await });
    }

    pub fn refresh_recent_sales(&self) {
        let orchestrator = self.get();
        spawn_local(async move { orchestrator.refresh_recent_sales().await });
    }
}

pub fn use_refresh() -> RefreshHandle {
    use_context::<RefreshHandle>().expect("RefreshHandle not found")
}
