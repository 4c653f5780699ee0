use crate::shared::refresh::WidgetState;
use leptos::prelude::*;
use thaw::*;

/// Loading, empty and error states shared by every widget.
///
/// `ready` renders the data; the other states get the standard markup.
pub fn widget_view<T, F, V>(state: WidgetState<T>, empty_text: &'static str, ready: F) -> AnyView
where
    F: FnOnce(T) -> V,
    V: IntoView + 'static,
{
    match state {
        WidgetState::Loading => view! {
            <div class="widget-status widget-status--loading">
                <Spinner size=SpinnerSize::Small />
                <span>"Caricamento..."</span>
            </div>
        }
        .into_any(),
        WidgetState::Empty => view! {
            <div class="widget-status widget-status--empty">{empty_text}</div>
        }
        .into_any(),
        WidgetState::Failed(message) => view! {
            <div class="warning-box warning-box--error">
                <span class="warning-box__icon">"⚠"</span>
                <span class="warning-box__text">{message}</span>
            </div>
        }
        .into_any(),
        WidgetState::Ready(value) => ready(value).into_any(),
    }
}
