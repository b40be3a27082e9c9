//! User-visible notification surface.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Informational message.
    Information,
    /// Something the user should look at.
    Warning,
    /// A failure.
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Information => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A notification as delivered to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
    /// When the notification was issued.
    pub issued_at: DateTime<Utc>,
}

/// The host's notification surface (toasts, message bar, ...).
pub trait NotificationSurface: Send + Sync {
    /// Shows a notification.
    fn notify(&self, level: NotificationLevel, message: &str);

    /// Shows an informational message.
    fn show_information(&self, message: &str) {
        self.notify(NotificationLevel::Information, message);
    }

    /// Shows a warning message.
    fn show_warning(&self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }

    /// Shows an error message.
    fn show_error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }
}

/// Notification surface that keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    /// Delivered notifications, oldest first.
    entries: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Returns the messages recorded at the given level.
    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.clone())
            .collect()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl NotificationSurface for RecordingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                level,
                message: message.to_string(),
                issued_at: Utc::now(),
            });
    }
}
