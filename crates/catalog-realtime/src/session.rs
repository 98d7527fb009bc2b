//! Notification session, the single owner of snapshot, live, and mutation
//! state for one authenticated user.
//!
//! Consumers create a session, call [`NotificationSession::start`], read
//! snapshots through the accessors, observe changes through
//! [`NotificationSession::subscribe_events`], and tear down with
//! [`NotificationSession::shutdown`]. Everything else happens inside.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

use catalog_client::{CredentialProvider, NotificationBackend};
use catalog_core::ClientResult;
use catalog_core::config::AppConfig;
use catalog_core::config::realtime::RealtimeConfig;
use catalog_core::types::NotificationId;
use catalog_entity::notification::{Notification, NotificationCount};

use crate::events::SessionEvent;
use crate::lifecycle::ConnectionStatus;
use crate::store::NotificationStore;
use crate::subscriber::SubscriberTask;

/// State shared between the session handle and its subscriber task.
#[derive(Debug)]
pub(crate) struct SessionShared {
    /// The reconciling notification store.
    pub(crate) store: NotificationStore,
    /// Current connection status, observable via `watch`.
    status_tx: watch::Sender<ConnectionStatus>,
    /// Automatic reconnect attempts since the last successful connect.
    attempts: AtomicU32,
    /// Fan-out channel for session events.
    events_tx: broadcast::Sender<SessionEvent>,
}

impl SessionShared {
    fn new(event_buffer: usize) -> Self {
        let (events_tx, _) = broadcast::channel(event_buffer.max(1));
        let (status_tx, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            store: NotificationStore::new(),
            status_tx,
            attempts: AtomicU32::new(0),
            events_tx,
        }
    }

    /// Record a lifecycle transition, emitting an event when the status
    /// actually changed.
    pub(crate) fn update_status(&self, status: ConnectionStatus, attempts: u32) {
        self.attempts.store(attempts, Ordering::Relaxed);
        let previous = self.status_tx.send_replace(status);
        if previous != status {
            self.emit(SessionEvent::StatusChanged(status));
        }
    }

    pub(crate) fn status(&self) -> ConnectionStatus {
        *self.status_tx.borrow()
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub(crate) fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    pub(crate) fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Events are advisory; absent subscribers are fine.
    pub(crate) fn emit(&self, event: SessionEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Install a fresh snapshot, emitting the new counters.
    ///
    /// Returns `false` when the store is closed and the snapshot was
    /// discarded.
    pub(crate) fn replace_snapshot(&self, notifications: Vec<Notification>) -> bool {
        if self.store.replace_all(notifications) {
            self.emit(SessionEvent::CountsChanged(self.store.counts()));
            true
        } else {
            false
        }
    }

    /// Reconcile a pushed notification into the store.
    ///
    /// Returns `true` when the push was new and merged; a redelivered id or
    /// a closed store returns `false` and leaves no trace.
    pub(crate) fn merge_live(&self, notification: Notification) -> bool {
        if self.store.apply(notification.clone()) {
            self.emit(SessionEvent::Received(notification));
            true
        } else {
            false
        }
    }
}

/// A live notification session for the authenticated user.
///
/// Owns the snapshot loader, the WebSocket subscriber, the reconciling
/// store, and the mutation gateway. The store is the only shared mutable
/// state; live pushes and gateway completions commute through its id-keyed
/// upsert rules, so no ordering between them is assumed anywhere.
#[derive(Debug)]
pub struct NotificationSession {
    shared: Arc<SessionShared>,
    backend: Arc<dyn NotificationBackend>,
    credentials: Arc<dyn CredentialProvider>,
    realtime: RealtimeConfig,
    ws_url: String,
    shutdown_tx: watch::Sender<bool>,
    reconnect_tx: watch::Sender<u64>,
    subscriber: Mutex<Option<JoinHandle<()>>>,
    session_id: Uuid,
}

impl NotificationSession {
    /// Create a session. No I/O happens until [`start`](Self::start).
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn NotificationBackend>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let (reconnect_tx, _) = watch::channel(0);
        Self {
            shared: Arc::new(SessionShared::new(config.realtime.event_buffer_size)),
            backend,
            credentials,
            realtime: config.realtime.clone(),
            ws_url: config.realtime.ws_url(&config.api.base_url),
            shutdown_tx,
            reconnect_tx,
            subscriber: Mutex::new(None),
            session_id: Uuid::new_v4(),
        }
    }

    /// Load the initial snapshot and start the live subscriber.
    ///
    /// The subscriber starts regardless of the snapshot outcome, so a
    /// degraded start still converges once connectivity returns; the
    /// snapshot result is returned for the caller to surface.
    pub async fn start(&self) -> ClientResult<()> {
        info!(session_id = %self.session_id, ws_url = %self.ws_url, "Starting notification session");
        let initial = self.refresh().await;
        if let Err(ref e) = initial {
            warn!(session_id = %self.session_id, error = %e, "Initial snapshot failed");
        }
        self.spawn_subscriber();
        initial
    }

    /// Fetch a fresh snapshot and replace the local list with it.
    pub async fn refresh(&self) -> ClientResult<()> {
        let notifications = self.backend.fetch_all().await?;
        debug!(
            session_id = %self.session_id,
            count = notifications.len(),
            "Snapshot loaded"
        );
        self.shared.replace_snapshot(notifications);
        Ok(())
    }

    // ── Mutation gateway ────────────────────────────────────────────────
    //
    // Each operation calls the backend first and only mirrors the change
    // locally after it succeeds, so a failure never needs a rollback. A
    // backend 404 counts as success: the resource is gone server-side and
    // the local mirror may converge.

    /// Mark one notification as read.
    ///
    /// Silent no-op when the id is unknown locally or already read.
    pub async fn mark_as_read(&self, id: NotificationId) -> ClientResult<()> {
        match self.shared.store.get(id) {
            None => {
                debug!(notification_id = %id, "mark_as_read skipped; not present locally");
                return Ok(());
            }
            Some(existing) if existing.is_read => {
                debug!(notification_id = %id, "mark_as_read skipped; already read");
                return Ok(());
            }
            Some(_) => {}
        }

        match self.backend.mark_read(id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(notification_id = %id, "Notification gone server-side; mark_as_read treated as done");
            }
            Err(e) => {
                warn!(notification_id = %id, error = %e, "mark_as_read failed; local state unchanged");
                return Err(e);
            }
        }

        if self.shared.store.mark_read(id) {
            self.shared
                .emit(SessionEvent::CountsChanged(self.shared.store.counts()));
        }
        Ok(())
    }

    /// Mark every notification as read.
    pub async fn mark_all_as_read(&self) -> ClientResult<()> {
        self.backend.mark_all_read().await.map_err(|e| {
            warn!(error = %e, "mark_all_as_read failed; local state unchanged");
            e
        })?;

        let changed = self.shared.store.mark_all_read();
        if changed > 0 {
            debug!(changed, "Marked all notifications read");
            self.shared
                .emit(SessionEvent::CountsChanged(self.shared.store.counts()));
        }
        Ok(())
    }

    /// Delete one notification.
    ///
    /// Silent no-op when the id is unknown locally.
    pub async fn delete_notification(&self, id: NotificationId) -> ClientResult<()> {
        if self.shared.store.get(id).is_none() {
            debug!(notification_id = %id, "delete skipped; not present locally");
            return Ok(());
        }

        match self.backend.delete(id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(notification_id = %id, "Notification gone server-side; delete treated as done");
            }
            Err(e) => {
                warn!(notification_id = %id, error = %e, "delete failed; local state unchanged");
                return Err(e);
            }
        }

        if self.shared.store.remove(id).is_some() {
            self.shared
                .emit(SessionEvent::CountsChanged(self.shared.store.counts()));
        }
        Ok(())
    }

    /// Delete every notification.
    pub async fn clear_all_notifications(&self) -> ClientResult<()> {
        self.backend.clear_all().await.map_err(|e| {
            warn!(error = %e, "clear_all failed; local state unchanged");
            e
        })?;

        let removed = self.shared.store.clear();
        if removed > 0 {
            debug!(removed, "Cleared all notifications");
            self.shared
                .emit(SessionEvent::CountsChanged(self.shared.store.counts()));
        }
        Ok(())
    }

    // ── Snapshot accessors ──────────────────────────────────────────────

    /// Current notification list, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.shared.store.notifications()
    }

    /// Clone one notification by id.
    pub fn notification(&self, id: NotificationId) -> Option<Notification> {
        self.shared.store.get(id)
    }

    /// Unread and total counters.
    pub fn counts(&self) -> NotificationCount {
        self.shared.store.counts()
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> usize {
        self.shared.store.unread_count()
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.shared.status()
    }

    /// Whether the live subscription is currently established.
    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Automatic reconnect attempts since the last successful connect.
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.attempts()
    }

    /// Watch connection status transitions.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.shared.watch_status()
    }

    /// Subscribe to session events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.subscribe_events()
    }

    // ── Lifecycle control ───────────────────────────────────────────────

    /// Request a manual reconnect.
    ///
    /// Resets the backoff schedule. Safe to call at any time; while a
    /// connect attempt is already in flight it is absorbed as a no-op.
    pub fn reconnect(&self) {
        info!(session_id = %self.session_id, "Manual reconnect requested");
        self.reconnect_tx.send_modify(|generation| *generation += 1);
    }

    /// Tear the session down.
    ///
    /// Closes the store first so completions of still-in-flight gateway
    /// calls land in a void, then stops the subscriber and waits briefly
    /// for it to exit. A torn-down session stays down; start a new one to
    /// resume.
    pub async fn shutdown(&self) {
        info!(session_id = %self.session_id, "Shutting down notification session");
        self.shared.store.close();
        self.shutdown_tx.send_replace(true);

        let handle = {
            let mut guard = self.subscriber.lock().unwrap_or_else(PoisonError::into_inner);
            guard.take()
        };
        if let Some(handle) = handle {
            let grace = Duration::from_secs(self.realtime.shutdown_timeout_seconds.max(1));
            match time::timeout(grace, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(session_id = %self.session_id, error = %e, "Subscriber task ended abnormally")
                }
                Err(_) => {
                    warn!(session_id = %self.session_id, "Subscriber task did not stop in time")
                }
            }
        }

        self.shared.update_status(ConnectionStatus::Disconnected, 0);
        debug!(session_id = %self.session_id, "Notification session closed");
    }

    fn spawn_subscriber(&self) {
        let mut guard = self.subscriber.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            debug!(session_id = %self.session_id, "Subscriber already running");
            return;
        }

        let task = SubscriberTask {
            shared: Arc::clone(&self.shared),
            backend: Arc::clone(&self.backend),
            credentials: Arc::clone(&self.credentials),
            config: self.realtime.clone(),
            ws_url: self.ws_url.clone(),
        };
        let shutdown_rx = self.shutdown_tx.subscribe();
        let reconnect_rx = self.reconnect_tx.subscribe();
        *guard = Some(tokio::spawn(task.run(shutdown_rx, reconnect_rx)));
    }
}
