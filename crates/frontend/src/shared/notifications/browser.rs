use super::{NotificationSink, Toast, ToastKind};
use crate::shared::config::NotificationsConfig;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, Notification, NotificationOptions, NotificationPermission};

/// Sink backed by the DOM: toast list signal, `<audio>` and the Notification API
#[derive(Clone)]
pub struct BrowserSink {
    pub toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
    sound_url: String,
    toast_ms: u32,
}

impl BrowserSink {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
            sound_url: config.sound_url.clone(),
            toast_ms: config.toast_ms,
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

impl NotificationSink for BrowserSink {
    fn toast(&self, kind: ToastKind, message: &str) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                kind,
                message: message.to_string(),
            })
        });

        let toasts = self.toasts;
        Timeout::new(self.toast_ms, move || {
            toasts.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    fn play_sound(&self) {
        let audio = match HtmlAudioElement::new_with_src(&self.sound_url) {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Audio element not available: {:?}", e);
                return;
            }
        };
        // Browsers reject playback until the user has interacted with the page
        if let Err(e) = audio.play() {
            log::warn!("Audio play failed: {:?}", e);
        }
    }

    fn native(&self, title: &str, body: &str) {
        if Notification::permission() != NotificationPermission::Granted {
            log::debug!("Native notification skipped: permission not granted");
            return;
        }
        let options = NotificationOptions::new();
        options.set_body(body);
        if let Err(e) = Notification::new_with_options(title, &options) {
            log::warn!("Notification failed: {:?}", e);
        }
    }
}

/// Ask for the notification permission when it was never asked before
pub async fn request_permission() -> NotificationPermission {
    if Notification::permission() != NotificationPermission::Default {
        return Notification::permission();
    }
    match Notification::request_permission() {
        Ok(promise) => {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Notification permission request failed: {:?}", e);
            }
        }
        Err(e) => log::warn!("Notification API not available: {:?}", e),
    }
    let permission = Notification::permission();
    log::info!("Notification permission: {:?}", permission);
    permission
}
