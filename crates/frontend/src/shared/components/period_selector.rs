use chrono::Local;
use contracts::shared::period::{PeriodFilter, PeriodKind};
use leptos::prelude::*;
use thaw::*;

const ALL_TOKEN: &str = "all";

/// Map a `<select>` value back to a period; `custom` is handled by the caller
fn parse_choice(token: &str) -> Option<Option<PeriodKind>> {
    match token {
        ALL_TOKEN => Some(None),
        "custom" => None,
        other => other.parse::<PeriodKind>().ok().map(Some),
    }
}

/// Period `<select>` with an inline start/end picker for the custom range.
///
/// Custom ranges are resolved before `on_change` fires, so an inverted or
/// incomplete range never reaches the store.
#[component]
pub fn PeriodSelector(
    /// Presets shown before "Personalizzato"
    options: Vec<PeriodKind>,
    /// Adds a "Tutto" entry that maps to `None`
    #[prop(optional)]
    allow_all: bool,
    /// Token selected at mount
    #[prop(into)]
    initial: String,
    on_change: Callback<Option<PeriodKind>>,
) -> impl IntoView {
    let selected = RwSignal::new(initial);
    let date_start = RwSignal::new(String::new());
    let date_end = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);

    let on_select = move |ev: leptos::ev::Event| {
        let token = event_target_value(&ev);
        selected.set(token.clone());
        error.set(None);
        if let Some(choice) = parse_choice(&token) {
            on_change.run(choice);
        }
    };

    let apply_custom = move |_| {
        let kind = PeriodKind::custom(date_start.get_untracked(), date_end.get_untracked());
        match PeriodFilter::resolve(kind.clone(), Local::now().date_naive()) {
            Ok(_) => {
                error.set(None);
                on_change.run(Some(kind));
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    view! {
        <div class="period-selector">
            <select class="period-selector__select" on:change=on_select prop:value=move || selected.get()>
                {allow_all.then(|| view! { <option value=ALL_TOKEN>"Tutto"</option> })}
                {options.into_iter().map(|kind| {
                    let token = kind.token();
                    let token_for_selected = token.clone();
                    view! {
                        <option value=token selected=move || selected.get() == token_for_selected>
                            {kind.display_name()}
                        </option>
                    }
                }).collect_view()}
                <option value="custom">"Personalizzato"</option>
            </select>
            <Show when=move || selected.get() == "custom">
                <Flex gap=FlexGap::Small align=FlexAlign::Center>
                    <input type="date" class="period-selector__date" bind:value=date_start />
                    <span>"–"</span>
                    <input type="date" class="period-selector__date" bind:value=date_end />
                    <Button size=ButtonSize::Small appearance=ButtonAppearance::Primary on_click=apply_custom>
                        "Applica"
                    </Button>
                </Flex>
            </Show>
            {move || error.get().map(|e| view! { <span class="period-selector__error">{e}</span> })}
        </div>
    }
}
