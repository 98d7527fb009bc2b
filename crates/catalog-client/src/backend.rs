//! The backend seam the notification session talks through.

use async_trait::async_trait;

use catalog_core::ClientResult;
use catalog_core::types::NotificationId;
use catalog_entity::notification::Notification;
use catalog_entity::user::CurrentUser;

/// Backend operations the notification session depends on.
///
/// The production implementation is [`crate::rest::RestBackend`]; session
/// tests substitute in-memory fakes.
#[async_trait]
pub trait NotificationBackend: Send + Sync + std::fmt::Debug {
    /// Resolve the authenticated user.
    async fn current_user(&self) -> ClientResult<CurrentUser>;

    /// Fetch the complete notification list for the authenticated user.
    async fn fetch_all(&self) -> ClientResult<Vec<Notification>>;

    /// Mark a single notification as read.
    async fn mark_read(&self, id: NotificationId) -> ClientResult<()>;

    /// Mark every notification as read.
    async fn mark_all_read(&self) -> ClientResult<()>;

    /// Delete a single notification.
    async fn delete(&self, id: NotificationId) -> ClientResult<()>;

    /// Delete every notification.
    async fn clear_all(&self) -> ClientResult<()>;
}
