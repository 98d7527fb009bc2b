//! Session-local notification store.
//!
//! Single source of truth for the notification list between snapshot
//! refreshes. Live pushes and gateway mutations both land here under one
//! mutex, and the unread count is derived from the entries inside the same
//! critical section, so it cannot drift from the list.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use catalog_core::types::NotificationId;
use catalog_entity::notification::{Notification, NotificationCount, model};

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<NotificationId, Notification>,
    /// Identifiers in display order, newest first.
    order: Vec<NotificationId>,
    /// Set on session teardown; a closed store discards every mutation.
    closed: bool,
}

/// In-memory notification list with upsert-or-ignore reconciliation.
#[derive(Debug, Default)]
pub struct NotificationStore {
    inner: Mutex<StoreInner>,
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Merge a pushed notification into the list.
    ///
    /// Returns `false` when the identifier is already present (the push is
    /// a redelivery; the existing entry wins) or when the store is closed.
    pub fn apply(&self, notification: Notification) -> bool {
        let mut inner = self.lock();
        if inner.closed || inner.entries.contains_key(&notification.id) {
            return false;
        }
        inner.order.insert(0, notification.id);
        inner.entries.insert(notification.id, notification);
        true
    }

    /// Replace the whole list with a fresh snapshot, newest first.
    ///
    /// Returns `false` when the store is closed and the snapshot was
    /// discarded.
    pub fn replace_all(&self, mut notifications: Vec<Notification>) -> bool {
        model::sort_newest_first(&mut notifications);
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        inner.entries.clear();
        inner.order.clear();
        for notification in notifications {
            // A snapshot repeating an id keeps the first occurrence.
            if inner.entries.contains_key(&notification.id) {
                continue;
            }
            inner.order.push(notification.id);
            inner.entries.insert(notification.id, notification);
        }
        true
    }

    /// Flip one notification to read. Returns `true` if anything changed.
    pub fn mark_read(&self, id: NotificationId) -> bool {
        let mut inner = self.lock();
        if inner.closed {
            return false;
        }
        match inner.entries.get_mut(&id) {
            Some(notification) if !notification.is_read => {
                notification.is_read = true;
                true
            }
            _ => false,
        }
    }

    /// Flip every notification to read. Returns how many changed.
    pub fn mark_all_read(&self) -> usize {
        let mut inner = self.lock();
        if inner.closed {
            return 0;
        }
        let mut changed = 0;
        for notification in inner.entries.values_mut() {
            if !notification.is_read {
                notification.is_read = true;
                changed += 1;
            }
        }
        changed
    }

    /// Remove one notification. Returns the removed entry, if present.
    pub fn remove(&self, id: NotificationId) -> Option<Notification> {
        let mut inner = self.lock();
        if inner.closed {
            return None;
        }
        let removed = inner.entries.remove(&id)?;
        inner.order.retain(|other| *other != id);
        Some(removed)
    }

    /// Remove every notification. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut inner = self.lock();
        if inner.closed {
            return 0;
        }
        let removed = inner.entries.len();
        inner.entries.clear();
        inner.order.clear();
        removed
    }

    /// Close the store and drop its contents.
    ///
    /// Called on session teardown; every mutation arriving afterwards (for
    /// example the completion of an in-flight gateway call) is discarded.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.entries.clear();
        inner.order.clear();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Clone one notification by id.
    pub fn get(&self, id: NotificationId) -> Option<Notification> {
        self.lock().entries.get(&id).cloned()
    }

    /// Clone the list in display order, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.entries.get(id).cloned())
            .collect()
    }

    /// Unread and total counters, derived under one lock hold.
    pub fn counts(&self) -> NotificationCount {
        let inner = self.lock();
        let unread = inner
            .entries
            .values()
            .filter(|notification| !notification.is_read)
            .count();
        NotificationCount::new(unread, inner.entries.len())
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.counts().unread_count
    }

    /// Total number of notifications.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
