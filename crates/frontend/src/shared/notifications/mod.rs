//! Feedback for the user: toasts, the cash-register sound and native
//! notifications.
//!
//! [`NotificationSink`] is implemented by [`browser::BrowserSink`] in the
//! app and by [`RecordingSink`] in tests.

pub mod browser;
pub mod tracker;

pub use browser::BrowserSink;
pub use tracker::NewSalesTracker;

use crate::shared::config::NotificationsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
            ToastKind::Info => "toast toast--info",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// User toggles from the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub sound: bool,
    pub push: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            sound: true,
            push: true,
        }
    }
}

impl From<&NotificationsConfig> for NotificationSettings {
    fn from(config: &NotificationsConfig) -> Self {
        Self {
            sound: config.sound,
            push: config.push,
        }
    }
}

pub trait NotificationSink {
    fn toast(&self, kind: ToastKind, message: &str);

    fn play_sound(&self);

    /// OS-level notification; skipped when the browser has not granted it
    fn native(&self, title: &str, body: &str);
}

pub const NEW_SALE_TITLE: &str = "Nuova Vendita!";

pub fn new_sales_message(count: u64) -> String {
    format!("Hai fatto {} nuove vendite oggi!", count)
}

/// Tell the user that `count` sales arrived since the last refresh
pub fn announce_new_sales<N>(sink: &N, settings: NotificationSettings, count: u64)
where
    N: NotificationSink + ?Sized,
{
    let message = new_sales_message(count);
    log::info!("{}", message);
    sink.toast(ToastKind::Info, &message);
    if settings.sound {
        sink.play_sound();
    }
    if settings.push {
        sink.native(NEW_SALE_TITLE, &message);
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Toast(ToastKind, String),
    Sound,
    Native(String, String),
}

#[cfg(test)]
#[derive(Default)]
pub struct RecordingSink {
    pub events: std::cell::RefCell<Vec<Feedback>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn take(&self) -> Vec<Feedback> {
        self.events.borrow_mut().drain(..).collect()
    }
}

#[cfg(test)]
impl NotificationSink for RecordingSink {
    fn toast(&self, kind: ToastKind, message: &str) {
        self.events
            .borrow_mut()
            .push(Feedback::Toast(kind, message.to_string()));
    }

    fn play_sound(&self) {
        self.events.borrow_mut().push(Feedback::Sound);
    }

    fn native(&self, title: &str, body: &str) {
        self.events
            .borrow_mut()
            .push(Feedback::Native(title.to_string(), body.to_string()));
    }
}
