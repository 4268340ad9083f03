//! Local UI chrome state: the toast stack.
//!
//! DESIGN
//! ======
//! Keeps transient presentation concerns out of session and resource state so
//! the notification surface can evolve independently of protocol data.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::collections::VecDeque;

use crate::util::notify::Notification;

/// Maximum number of toasts kept on screen; the oldest is dropped first.
pub const TOAST_CAP: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub toasts: VecDeque<Toast>,
    next_toast_id: u64,
}

impl UiState {
    /// Append a toast, evicting the oldest when [`TOAST_CAP`] is reached.
    /// Returns the new toast id.
    pub fn push_notification(&mut self, notification: Notification) -> u64 {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        if self.toasts.len() >= TOAST_CAP {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast { id, notification });
        id
    }

    /// Toasts in display order, oldest first.
    #[must_use]
    pub fn visible(&self) -> Vec<Toast> {
        self.toasts.iter().cloned().collect()
    }

    /// Remove a toast by id. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }
}
