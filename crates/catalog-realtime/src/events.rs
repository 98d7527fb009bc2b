//! Session event stream for consumers.

use catalog_entity::notification::{Notification, NotificationCount};

use crate::lifecycle::ConnectionStatus;

/// An observable change in the notification session.
///
/// Delivered over a `tokio::sync::broadcast` channel. A slow consumer may
/// observe `Lagged`; the session's snapshot accessors are always current,
/// so re-reading them is the recovery.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new notification arrived on the live topic.
    Received(Notification),
    /// The connection lifecycle moved to a new status.
    StatusChanged(ConnectionStatus),
    /// The unread/total counters changed outside a live delivery.
    CountsChanged(NotificationCount),
}
