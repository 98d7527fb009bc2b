//! Shared test helpers for session integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use catalog_client::backend::NotificationBackend;
use catalog_client::credentials::Anonymous;
use catalog_core::ClientResult;
use catalog_core::config::AppConfig;
use catalog_core::error::ClientError;
use catalog_core::types::{NotificationId, UserId};
use catalog_entity::notification::{Notification, NotificationKind};
use catalog_entity::user::CurrentUser;
use catalog_realtime::NotificationSession;

/// Build a notification with a timestamp in the recent past.
pub fn make_notification(id: i64, is_read: bool, minutes_ago: i64) -> Notification {
    Notification {
        id: NotificationId::new(id),
        recipient_user_id: UserId::new(7),
        message: format!("notification {id}"),
        notification_type: NotificationKind::Comment,
        project_id: None,
        comment_id: None,
        is_read,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        project_title: None,
        comment_text: None,
        commenter_name: None,
        approver_name: None,
        rejection_reason: None,
    }
}

/// In-memory backend with scriptable failures.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    /// Server-side notification list.
    pub items: Mutex<Vec<Notification>>,
    /// Every backend call, in order.
    pub calls: Mutex<Vec<String>>,
    /// When set, `current_user` fails with an authentication error.
    pub fail_identity: AtomicBool,
    /// When set, every mutation fails with a network error.
    pub fail_mutations: AtomicBool,
}

impl ScriptedBackend {
    pub fn with_items(items: Vec<Notification>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn mutation_guard(&self) -> ClientResult<()> {
        if self.fail_mutations.load(Ordering::Relaxed) {
            Err(ClientError::network("backend unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationBackend for ScriptedBackend {
    async fn current_user(&self) -> ClientResult<CurrentUser> {
        self.record("current_user");
        if self.fail_identity.load(Ordering::Relaxed) {
            return Err(ClientError::authentication("session expired"));
        }
        Ok(CurrentUser {
            id: UserId::new(7),
            name: Some("Alice".to_string()),
            email: None,
            role: Some("STUDENT".to_string()),
        })
    }

    async fn fetch_all(&self) -> ClientResult<Vec<Notification>> {
        self.record("fetch_all");
        Ok(self.items.lock().unwrap().clone())
    }

    async fn mark_read(&self, id: NotificationId) -> ClientResult<()> {
        self.record(format!("mark_read:{id}"));
        self.mutation_guard()?;
        for item in self.items.lock().unwrap().iter_mut() {
            if item.id == id {
                item.is_read = true;
            }
        }
        Ok(())
    }

    async fn mark_all_read(&self) -> ClientResult<()> {
        self.record("mark_all_read");
        self.mutation_guard()?;
        for item in self.items.lock().unwrap().iter_mut() {
            item.is_read = true;
        }
        Ok(())
    }

    async fn delete(&self, id: NotificationId) -> ClientResult<()> {
        self.record(format!("delete:{id}"));
        self.mutation_guard()?;
        self.items.lock().unwrap().retain(|item| item.id != id);
        Ok(())
    }

    async fn clear_all(&self) -> ClientResult<()> {
        self.record("clear_all");
        self.mutation_guard()?;
        self.items.lock().unwrap().clear();
        Ok(())
    }
}

/// Session wired to a scripted backend and anonymous credentials.
pub fn make_session(backend: Arc<ScriptedBackend>) -> NotificationSession {
    NotificationSession::new(&AppConfig::default(), backend, Arc::new(Anonymous))
}
