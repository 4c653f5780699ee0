//! Tab content registry: maps `tab.key` to the page it shows.

use super::tab_labels::{D400_SALES_OVERVIEW, D401_PLATFORM_ANALYTICS, P900_SALES_HISTORY};
use crate::dashboards::d400_sales_overview::ui::SalesOverviewDashboard;
use crate::dashboards::d401_platform_analytics::ui::PlatformAnalyticsPage;
use crate::projections::p900_sales_history::ui::SalesHistoryList;
use leptos::prelude::*;

pub fn render_tab_content(key: &str) -> AnyView {
    match key {
        D400_SALES_OVERVIEW => view! { <SalesOverviewDashboard /> }.into_any(),
        D401_PLATFORM_ANALYTICS => view! { <PlatformAnalyticsPage /> }.into_any(),
        P900_SALES_HISTORY => view! { <SalesHistoryList /> }.into_any(),
        _ => {
            log::warn!("Unknown tab type: {}", key);
            view! { <div class="placeholder">"Pagina non trovata"</div> }.into_any()
        }
    }
}
