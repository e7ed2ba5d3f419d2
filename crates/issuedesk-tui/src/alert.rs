//! Alert notifications
//!
//! Every alert is its own dismissible unit. Success and info alerts expire on
//! their own; errors stay until the user dismisses them.

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    pub fn auto_dismiss(&self) -> bool {
        !matches!(self, AlertKind::Error)
    }
}

/// Creation time in milliseconds, with a sequence number to keep alerts
/// raised within the same millisecond apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertId {
    millis: i64,
    seq: u64,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub id: AlertId,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    shown_at: Instant,
}

pub struct AlertCenter {
    alerts: Vec<Alert>,
    timeout: Duration,
    next_seq: u64,
}

impl AlertCenter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            alerts: Vec::new(),
            timeout,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, kind: AlertKind, message: impl Into<String>) -> AlertId {
        let created_at = Utc::now();
        let id = AlertId {
            millis: created_at.timestamp_millis(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.alerts.push(Alert {
            id,
            kind,
            message: message.into(),
            created_at,
            shown_at: Instant::now(),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> AlertId {
        self.push(AlertKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> AlertId {
        self.push(AlertKind::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> AlertId {
        self.push(AlertKind::Info, message)
    }

    pub fn dismiss(&mut self, id: AlertId) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        self.alerts.len() != before
    }

    pub fn dismiss_latest(&mut self) -> bool {
        self.alerts.pop().is_some()
    }

    /// Drop auto-dismissing alerts older than the timeout
    pub fn expire(&mut self, now: Instant) {
        let timeout = self.timeout;
        self.alerts.retain(|alert| {
            !alert.kind.auto_dismiss() || now.saturating_duration_since(alert.shown_at) < timeout
        });
    }

    /// Oldest first
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
