use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Seconds a notification stays visible unless dismissed earlier.
pub const NOTIFICATION_TTL_SECS: i64 = 4;

/// Severity class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

/// Transient user-visible notification.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Identifier used for dismissal.
    pub id: Uuid,
    /// Message text (Spanish product copy).
    pub message: String,
    /// Severity class.
    pub severity: Severity,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Auto-expiry deadline.
    pub expires_at: DateTime<Utc>,
}

/// Owns the list of active notifications.
///
/// Single-threaded and clock-driven: the caller passes `now` in, and
/// auto-expiry happens in `purge_expired` sweeps. Removing by id is
/// idempotent, so a manual dismiss followed by the expiry sweep is safe.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notification and returns its id.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        let message = message.into();
        tracing::debug!("Notification [{:?}]: {}", severity, message);
        self.items.push(Notification {
            id,
            message,
            severity,
            created_at: now,
            expires_at: now + Duration::seconds(NOTIFICATION_TTL_SECS),
        });
        id
    }

    /// Removes a notification by id.
    ///
    /// Returns whether anything was removed; a second call with the same id
    /// is a no-op.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drops every notification whose deadline has passed.
    ///
    /// Returns the number removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        before - self.items.len()
    }

    /// Currently active notifications, oldest first.
    pub fn active(&self) -> &[Notification] {
        &self.items
    }
}
