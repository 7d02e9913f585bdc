//! Toast-style notifications emitted by the controllers

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Receiver of notifications
///
/// Fire-and-forget: the caller never learns whether anything was shown.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes every notification to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Default => {
                tracing::info!(title = %notification.title, "{}", notification.message)
            }
            Severity::Destructive => {
                tracing::warn!(title = %notification.title, "{}", notification.message)
            }
        }
    }
}

/// Keeps notifications in memory so they can be inspected later
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything received so far
    pub fn drain(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut received| std::mem::take(&mut *received))
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .ok()
            .and_then(|received| received.last().cloned())
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "notification recorded");
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

/// Forwards every notification to several sinks
#[derive(Clone, Default)]
pub struct TeeSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl TeeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl NotificationSink for TeeSink {
    fn notify(&self, notification: Notification) {
        for sink in &self.sinks {
            sink.notify(notification.clone());
        }
    }
}
