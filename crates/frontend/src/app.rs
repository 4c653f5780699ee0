use crate::app_shell::MainLayout;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::config::{default_config, load_config, Config};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    provide_context(AppGlobalContext::new());

    let config = RwSignal::new(None::<Config>);

    spawn_local(async move {
        let loaded = match load_config().await {
            Ok(config) => Some(config),
            Err(e) => {
                log::error!("Failed to load config: {}", e);
                default_config().ok()
            }
        };
        if let Some(loaded) = loaded {
            log::set_max_level(loaded.logging.level().to_level_filter());
            config.set(Some(loaded));
        }
    });

    view! {
        {move || match config.get() {
            Some(config) => view! { <MainLayout config=config /> }.into_any(),
            None => view! {
                <div class="app-loading">"Caricamento..."</div>
            }.into_any(),
        }}
    }
}
