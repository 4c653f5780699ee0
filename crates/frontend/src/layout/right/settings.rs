use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use crate::shared::notifications::browser::request_permission;
use crate::shared::notifications::{BrowserSink, NotificationSink};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use web_sys::{Notification, NotificationPermission};

fn permission_label(permission: NotificationPermission) -> &'static str {
    match permission {
        NotificationPermission::Granted => "Notifiche consentite",
        NotificationPermission::Denied => "Notifiche bloccate dal browser",
        _ => "Permesso notifiche non ancora richiesto",
    }
}

/// Notification toggles and the test-sound button
#[component]
pub fn SettingsPanel() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let sink = use_context::<BrowserSink>().expect("BrowserSink not found");

    let initial = ctx.settings.get_untracked();
    let sound = RwSignal::new(initial.sound);
    let push = RwSignal::new(initial.push);
    let permission = RwSignal::new(Notification::permission());
    let played = RwSignal::new(false);

    Effect::new(move |_| {
        let enabled = sound.get();
        ctx.settings.update(|s| s.sound = enabled);
    });

    Effect::new(move |prev: Option<bool>| {
        let enabled = push.get();
        ctx.settings.update(|s| s.push = enabled);
        if enabled && prev == Some(false) {
            spawn_local(async move {
                permission.set(request_permission().await);
            });
        }
        enabled
    });

    view! {
        <div class="app-panel__content settings-panel">
            <div class="settings-panel__header">
                {icon("settings")}
                <h3>"Impostazioni"</h3>
            </div>
            <Flex vertical=true gap=FlexGap::Medium>
                <Switch checked=sound label="Suono nuove vendite" />
                <Switch checked=push label="Notifiche push" />
                <span class="settings-panel__hint">
                    {move || permission_label(permission.get())}
                </span>
                <span class="settings-panel__sound" class:settings-panel__sound--played=move || played.get()>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            sink.play_sound();
                            played.set(true);
                            Timeout::new(500, move || played.set(false)).forget();
                        }
                    >
                        {icon("volume")}
                        "Prova suono"
                    </Button>
                </span>
            </Flex>
        </div>
    }
}
