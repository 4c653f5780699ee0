use super::api::check_email;
use crate::shared::icons::icon;
use crate::shared::refresh::use_refresh;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

#[component]
pub fn CheckEmailButton() -> impl IntoView {
    let refresh = use_refresh();
    let checking = RwSignal::new(false);

    let on_click = move |_| {
        if checking.get_untracked() {
            return;
        }
        checking.set(true);
        let orchestrator = refresh.get();
        spawn_local(async move {
            if check_email(&orchestrator).await.is_ok() {
                refresh.mark_refreshed();
            }
            checking.set(false);
        });
    };

    view! {
        <Button
            appearance=ButtonAppearance::Subtle
            on_click=on_click
            loading=checking
            disabled=checking
        >
            {icon("mail")}
            <span>{move || if checking.get() { "Controllo..." } else { "Controlla Email" }}</span>
        </Button>
    }
}
