//! User-facing notification surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP client and the stores report outcomes through a [`Notifier`]
//! rather than touching the DOM. The app shell installs a [`ToastNotifier`]
//! that feeds the toast stack; everything else falls back to the log.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use leptos::prelude::*;

use crate::state::ui::UiState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    /// CSS modifier used by the toast stack.
    #[must_use]
    pub fn class_suffix(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level, title: title.into(), message: message.into() }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the `log` facade only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
    }
}

/// Pushes notifications into the reactive toast list.
#[derive(Clone, Copy, Debug)]
pub struct ToastNotifier {
    ui: RwSignal<UiState>,
}

impl ToastNotifier {
    pub fn new(ui: RwSignal<UiState>) -> Self {
        Self { ui }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
        self.ui.update(|ui| {
            ui.push_notification(notification);
        });
    }
}

fn log_notification(notification: &Notification) {
    let Notification { level, title, message } = notification;
    match level {
        NotificationLevel::Success | NotificationLevel::Info => log::info!("{title}: {message}"),
        NotificationLevel::Warning => log::warn!("{title}: {message}"),
        NotificationLevel::Error => log::error!("{title}: {message}"),
    }
}
