//! Application top bar: panel toggles, brand and the global actions
//! (refresh, email check, new sale).

use crate::domain::a002_sale::ui::NewSaleDialog;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::shared::refresh::use_refresh;
use crate::usecases::u501_check_email::CheckEmailButton;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let refresh = use_refresh();
    let new_sale_open = RwSignal::new(false);

    let is_sidebar_visible = move || ctx.left_open.get();
    let is_right_panel_visible = move || ctx.right_open.get();

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Nascondi menu" } else { "Mostra menu" }
                >
                    {move || if is_sidebar_visible() {
                        icon("panel-left-close")
                    } else {
                        icon("panel-left-open")
                    }}
                </button>
                <span class="top-header__title">"STL Sales Tracker"</span>
            </div>

            <div class="top-header__actions">
                <span class="top-header__last-refresh">
                    {move || refresh
                        .signals
                        .last_refresh
                        .get()
                        .map(|time| format!("Aggiornato alle {}", time))
                        .unwrap_or_else(|| "Caricamento...".to_string())}
                </span>

                <button
                    class="top-header__icon-btn"
                    on:click=move |_| refresh.refresh_all()
                    title="Aggiorna dati"
                >
                    {icon("refresh")}
                </button>

                <CheckEmailButton />

                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| new_sale_open.set(true)
                >
                    {icon("plus")}
                    "Nuova vendita"
                </Button>

                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_right()
                    title=move || if is_right_panel_visible() { "Nascondi impostazioni" } else { "Mostra impostazioni" }
                >
                    {move || if is_right_panel_visible() {
                        icon("panel-right-close")
                    } else {
                        icon("panel-right-open")
                    }}
                </button>
            </div>

            <NewSaleDialog open=new_sale_open />
        </div>
    }
}
