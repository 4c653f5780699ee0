//! Application shell: builds the store, the notification sink and the
//! refresh orchestrator, then renders the layout with the tab pages.

use crate::domain::a001_platform::api::load_platforms;
use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::layout::left::sidebar::Sidebar;
use crate::layout::right::SettingsPanel;
use crate::layout::tabs::tab_labels::D400_SALES_OVERVIEW;
use crate::layout::tabs::{tab_label_for_key, TabPage};
use crate::layout::Shell;
use crate::shared::components::ToastHost;
use crate::shared::config::Config;
use crate::shared::notifications::{BrowserSink, NotificationSettings};
use crate::shared::refresh::{
    AutoRefresh, DashboardSignals, DashboardState, RefreshHandle, RefreshOrchestrator,
};
use crate::shared::supabase::SupabaseClient;
use chrono::{Local, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;

/// Main application layout with Sidebar, Tabs and the settings panel.
#[component]
pub fn MainLayout(config: Config) -> impl IntoView {
    let tabs_store =
        use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    provide_context(config.clone());

    let store = Rc::new(SupabaseClient::new(&config));
    let sink = BrowserSink::new(&config.notifications);
    provide_context(sink.clone());

    let settings = NotificationSettings::from(&config.notifications);
    tabs_store.settings.set(settings);

    let signals = DashboardSignals::new();
    let state = Rc::new(DashboardState::new(
        config.dashboard.recent_sales_limit,
        config.dashboard.history_page_size,
        settings,
    ));
    let orchestrator = RefreshOrchestrator::new(
        store.clone(),
        Rc::new(signals),
        Rc::new(sink.clone()),
        state,
        Local,
        Rc::new(Utc::now),
    );
    let refresh = RefreshHandle::new(orchestrator, signals);
    provide_context(refresh);

    // Settings panel toggles feed the notification step of every refresh
    Effect::new(move |_| {
        let current = tabs_store.settings.get();
        refresh.get().state().settings.set(current);
    });

    let auto_refresh = AutoRefresh::start(config.refresh_interval_ms(), move || {
        log::debug!("Auto-refresh tick");
        refresh.refresh_all();
    });
    let _auto_refresh = StoredValue::new_local(auto_refresh);

    refresh.refresh_all();

    spawn_local(async move {
        match load_platforms(store.as_ref()).await {
            Ok(platforms) => tabs_store.platforms.set(platforms),
            Err(e) => log::error!("Failed to load platforms: {}", e),
        }
    });

    // Initialize router integration. This runs once when the component is created.
    tabs_store.init_router_integration();
    if tabs_store.opened.with_untracked(|tabs| tabs.is_empty()) {
        tabs_store.open_tab(D400_SALES_OVERVIEW, tab_label_for_key(D400_SALES_OVERVIEW));
    }

    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=move || {
                view! {
                    <For
                        each=move || tabs_store.opened.get()
                        key=|tab| tab.key.clone()
                        children=move |tab: TabData| {
                            view! {
                                <TabPage tab=tab tabs_store=tabs_store />
                            }
                        }
                    />
                }.into_any()
            }
            right=|| view! { <SettingsPanel /> }.into_any()
        />
        <ToastHost sink=sink />
    }
}
