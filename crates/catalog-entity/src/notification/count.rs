//! Unread/total notification counters.

use serde::{Deserialize, Serialize};

/// Unread and total counts for a user's notification list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCount {
    /// Number of unread notifications.
    pub unread_count: usize,
    /// Total number of notifications.
    pub total_count: usize,
}

impl NotificationCount {
    /// Create a counter pair.
    pub fn new(unread_count: usize, total_count: usize) -> Self {
        Self {
            unread_count,
            total_count,
        }
    }
}
