use crate::shared::icons::icon;
use crate::shared::notifications::BrowserSink;
use leptos::prelude::*;

/// Stack of toasts pushed through the browser sink
#[component]
pub fn ToastHost(sink: BrowserSink) -> impl IntoView {
    let toasts = sink.toasts;
    let sink = StoredValue::new(sink);

    view! {
        <div class="toast-host">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.kind.class()>
                            <span class="toast__message">{toast.message}</span>
                            <button
                                class="toast__close"
                                title="Chiudi"
                                on:click=move |_| sink.with_value(|s| s.dismiss(id))
                            >
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
