//! Integration tests for the notification session's public surface.
//!
//! Everything here goes through [`NotificationSession`] the way an embedding
//! application would: snapshot refresh, the mutation operations, the event
//! stream, and teardown. No sockets are involved; the live path has its own
//! tests.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::sync::broadcast::error::TryRecvError;

use catalog_core::error::ErrorKind;
use catalog_core::types::NotificationId;
use catalog_entity::notification::NotificationCount;
use catalog_realtime::{ConnectionStatus, SessionEvent};

use helpers::{ScriptedBackend, make_notification, make_session};

#[tokio::test]
async fn test_refresh_serves_snapshot_newest_first() {
    let backend = Arc::new(ScriptedBackend::with_items(vec![
        make_notification(1, true, 45),
        make_notification(3, false, 5),
        make_notification(2, false, 25),
    ]));
    let session = make_session(backend);

    session.refresh().await.unwrap();

    let ids: Vec<i64> = session
        .notifications()
        .iter()
        .map(|n| n.id.value())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(session.counts(), NotificationCount::new(2, 3));
    assert_eq!(session.unread_count(), 2);
    assert!(session.notification(NotificationId::new(2)).is_some());
    assert!(session.notification(NotificationId::new(9)).is_none());
}

#[tokio::test]
async fn test_session_starts_disconnected() {
    let backend = Arc::new(ScriptedBackend::default());
    let session = make_session(backend);

    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert!(!session.is_connected());
    assert_eq!(session.reconnect_attempts(), 0);
    assert_eq!(*session.watch_status().borrow(), ConnectionStatus::Disconnected);
    assert!(session.notifications().is_empty());
}

#[tokio::test]
async fn test_mutations_flow_through_backend() {
    let backend = Arc::new(ScriptedBackend::with_items(vec![
        make_notification(1, false, 30),
        make_notification(2, false, 20),
        make_notification(3, true, 10),
    ]));
    let session = make_session(Arc::clone(&backend));
    session.refresh().await.unwrap();

    session.mark_as_read(NotificationId::new(1)).await.unwrap();
    assert_eq!(session.unread_count(), 1);
    assert!(backend.items.lock().unwrap()[0].is_read);

    session.delete_notification(NotificationId::new(3)).await.unwrap();
    assert_eq!(session.counts(), NotificationCount::new(1, 2));
    assert_eq!(backend.items.lock().unwrap().len(), 2);

    session.mark_all_as_read().await.unwrap();
    assert_eq!(session.unread_count(), 0);

    session.clear_all_notifications().await.unwrap();
    assert!(session.notifications().is_empty());
    assert!(backend.items.lock().unwrap().is_empty());

    assert_eq!(backend.call_count("mark_read:1"), 1);
    assert_eq!(backend.call_count("delete:3"), 1);
    assert_eq!(backend.call_count("mark_all_read"), 1);
    assert_eq!(backend.call_count("clear_all"), 1);
}

#[tokio::test]
async fn test_mutation_failure_keeps_local_state_intact() {
    let backend = Arc::new(ScriptedBackend::with_items(vec![make_notification(
        1, false, 5,
    )]));
    let session = make_session(Arc::clone(&backend));
    session.refresh().await.unwrap();

    backend.fail_mutations.store(true, Ordering::Relaxed);

    let err = session.mark_as_read(NotificationId::new(1)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert!(err.kind.is_recoverable());
    assert_eq!(session.unread_count(), 1);

    let err = session.clear_all_notifications().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(session.counts(), NotificationCount::new(1, 1));

    // Once the backend recovers the same calls go through.
    backend.fail_mutations.store(false, Ordering::Relaxed);
    session.mark_as_read(NotificationId::new(1)).await.unwrap();
    assert_eq!(session.unread_count(), 0);
}

#[tokio::test]
async fn test_events_report_refresh_and_mutations() {
    let backend = Arc::new(ScriptedBackend::with_items(vec![
        make_notification(1, false, 10),
        make_notification(2, true, 5),
    ]));
    let session = make_session(backend);
    let mut events = session.subscribe_events();

    session.refresh().await.unwrap();
    match events.recv().await.unwrap() {
        SessionEvent::CountsChanged(counts) => {
            assert_eq!(counts, NotificationCount::new(1, 2));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    session.mark_as_read(NotificationId::new(1)).await.unwrap();
    match events.recv().await.unwrap() {
        SessionEvent::CountsChanged(counts) => {
            assert_eq!(counts, NotificationCount::new(0, 2));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // A repeated no-op mutation emits nothing.
    session.mark_as_read(NotificationId::new(1)).await.unwrap();
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_shutdown_freezes_the_session() {
    let backend = Arc::new(ScriptedBackend::with_items(vec![make_notification(
        1, false, 5,
    )]));
    let session = make_session(Arc::clone(&backend));
    session.refresh().await.unwrap();

    session.shutdown().await;
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
    assert!(session.notifications().is_empty());

    // Later refreshes and mutations leave no trace.
    session.refresh().await.unwrap();
    assert!(session.notifications().is_empty());
    session.mark_as_read(NotificationId::new(1)).await.unwrap();
    assert_eq!(backend.call_count("mark_read:1"), 0);

    // Teardown is idempotent.
    session.shutdown().await;
    assert_eq!(session.status(), ConnectionStatus::Disconnected);
}
