//! REST implementation of the notification backend.
//!
//! Endpoint paths follow the catalog API: `/users/me` for identity and
//! `/api/notifications` plus its sub-resources for everything else.

use async_trait::async_trait;

use catalog_core::ClientResult;
use catalog_core::types::NotificationId;
use catalog_entity::notification::Notification;
use catalog_entity::user::CurrentUser;

use crate::backend::NotificationBackend;
use crate::http::ApiClient;

/// [`NotificationBackend`] over the catalog REST API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    api: ApiClient,
}

impl RestBackend {
    /// Wrap an [`ApiClient`].
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl NotificationBackend for RestBackend {
    async fn current_user(&self) -> ClientResult<CurrentUser> {
        self.api.get_json("/users/me").await
    }

    async fn fetch_all(&self) -> ClientResult<Vec<Notification>> {
        self.api.get_json("/api/notifications").await
    }

    async fn mark_read(&self, id: NotificationId) -> ClientResult<()> {
        self.api
            .put_empty(&format!("/api/notifications/{id}/read"))
            .await
    }

    async fn mark_all_read(&self) -> ClientResult<()> {
        self.api.put_empty("/api/notifications/read-all").await
    }

    async fn delete(&self, id: NotificationId) -> ClientResult<()> {
        self.api
            .delete_empty(&format!("/api/notifications/{id}"))
            .await
    }

    async fn clear_all(&self) -> ClientResult<()> {
        self.api.delete_empty("/api/notifications/clear-all").await
    }
}
