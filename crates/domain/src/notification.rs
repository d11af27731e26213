//! In-app notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification id.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Whether the user has opened it.
    #[serde(default)]
    pub read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Counts unread notifications.
#[must_use]
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.read).count()
}
