use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::window_event_listener;
use leptos::prelude::*;

const DEFAULT_WIDTH: f64 = 280.0;
const MIN_WIDTH: f64 = 200.0;

/// Widest the panel may get for a window `window_width` px wide
fn max_width(window_width: f64) -> f64 {
    (window_width - 400.0 - 260.0).min(window_width * 0.5).max(MIN_WIDTH)
}

/// Resizable right panel; visibility follows `ctx.right_open`
#[component]
pub fn Right(children: Children) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let is_open = move || ctx.right_open.get();

    let width = RwSignal::new(DEFAULT_WIDTH);
    let is_resizing = RwSignal::new(false);
    let start_x = RwSignal::new(0.0f64);
    let start_width = RwSignal::new(DEFAULT_WIDTH);

    let on_resize_start = move |ev: leptos::ev::MouseEvent| {
        if !is_open() {
            return;
        }
        is_resizing.set(true);
        start_x.set(ev.client_x() as f64);
        start_width.set(width.get_untracked());
        ev.prevent_default();
    };

    let _ = window_event_listener(leptos::ev::mousemove, move |ev: leptos::ev::MouseEvent| {
        if !is_resizing.get_untracked() {
            return;
        }
        let Some(window_width) = web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
        else {
            return;
        };
        let dx = start_x.get_untracked() - ev.client_x() as f64;
        let new_width = (start_width.get_untracked() + dx).clamp(MIN_WIDTH, max_width(window_width));
        width.set(new_width);
    });

    let _ = window_event_listener(leptos::ev::mouseup, move |_ev: leptos::ev::MouseEvent| {
        if is_resizing.get_untracked() {
            is_resizing.set(false);
        }
    });

    // Keep the col-resize cursor while dragging outside the handle
    Effect::new(move |_| {
        let resizing = is_resizing.get();
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            let (cursor, select) = if resizing { ("col-resize", "none") } else { ("", "") };
            let _ = body.style().set_property("cursor", cursor);
            let _ = body.style().set_property("user-select", select);
        }
    });

    view! {
        <div
            data-zone="right"
            class="right-panel"
            class:right-panel--hidden=move || !is_open()
            class:right-panel--resizing=move || is_resizing.get()
            style:width=move || if is_open() { format!("{}px", width.get()) } else { "0px".to_string() }
        >
            <div class="right-panel__resizer" on:mousedown=on_resize_start></div>
            {children()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_width_never_below_minimum() {
        assert_eq!(max_width(1920.0), 960.0);
        assert_eq!(max_width(1200.0), 540.0);
        assert_eq!(max_width(500.0), MIN_WIDTH);
    }
}
