//! # Notification Seam
//!
//! Recoverable problems and happy-path confirmations surface to the cashier
//! as notifications, never as crashes. The terminal pushes them through the
//! `EventSink` trait; the UI shell renders toasts, tests use the no-op sink,
//! and headless runs fall back to the tracing sink.

use serde::Serialize;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A toast-style message for the cashier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Trait for delivering notifications (implemented by the UI shell).
pub trait EventSink: Send + Sync {
    /// Delivers a notification to the user.
    fn notify(&self, notification: Notification);
}

/// No-op sink for testing.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn notify(&self, _notification: Notification) {}
}

/// Sink that routes notifications into the log stream. The default for
/// headless embeddings.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(message = %notification.message, "notification");
            }
            NotificationLevel::Warning => {
                tracing::warn!(message = %notification.message, "notification");
            }
            NotificationLevel::Error => {
                tracing::error!(message = %notification.message, "notification");
            }
        }
    }
}
