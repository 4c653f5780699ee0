use crate::shared::components::number_format::format_thousands;
use crate::shared::icons::icon;
use contracts::projections::p900_sales_history::{HistoryPaging, PAGE_SIZE_OPTIONS};
use leptos::prelude::*;

fn page_info(paging: HistoryPaging, total_count: u64) -> String {
    format!(
        "Pagina {} di {} ({} vendite)",
        paging.page,
        paging.total_pages(total_count).max(1),
        format_thousands(total_count as i64)
    )
}

/// A size change always goes back to page 1; unknown sizes are ignored
fn resize(paging: HistoryPaging, value: &str) -> HistoryPaging {
    match value.parse::<u64>() {
        Ok(size) if PAGE_SIZE_OPTIONS.contains(&size) => HistoryPaging::first(size),
        _ => paging,
    }
}

/// Navigation bar of the history table.
///
/// Emits the requested [`HistoryPaging`]; the page reloads through the
/// orchestrator and feeds the new position back in.
#[component]
pub fn HistoryPager(
    #[prop(into)] paging: Signal<HistoryPaging>,
    #[prop(into)] total_count: Signal<u64>,
    on_change: Callback<HistoryPaging>,
) -> impl IntoView {
    let at_start = move || !paging.get().has_prev();
    let at_end = move || !paging.get().has_next(total_count.get());

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                title="Prima pagina"
                disabled=at_start
                on:click=move |_| on_change.run(HistoryPaging::first(paging.get_untracked().page_size))
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                title="Precedente"
                disabled=at_start
                on:click=move |_| on_change.run(paging.get_untracked().prev())
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || page_info(paging.get(), total_count.get())}
            </span>
            <button
                class="pagination-btn"
                title="Successiva"
                disabled=at_end
                on:click=move |_| on_change.run(paging.get_untracked().next())
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                title="Ultima pagina"
                disabled=at_end
                on:click=move |_| {
                    on_change.run(paging.get_untracked().last(total_count.get_untracked()))
                }
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                prop:value=move || paging.get().page_size.to_string()
                on:change=move |ev| {
                    let current = paging.get_untracked();
                    let next = resize(current, &event_target_value(&ev));
                    if next != current {
                        on_change.run(next);
                    }
                }
            >
                {PAGE_SIZE_OPTIONS.iter().map(|&size| view! {
                    <option value=size.to_string() selected=move || paging.get().page_size == size>
                        {size}
                    </option>
                }).collect_view()}
            </select>
        </div>
    }
}
