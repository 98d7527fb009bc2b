//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::types::{CommentId, NotificationId, ProjectId, UserId};

use super::kind::NotificationKind;
use crate::time;

/// A notification delivered to a catalog user.
///
/// Mirrors the JSON payload served by both the REST snapshot endpoint and
/// the live WebSocket topic (camelCase field names). Fields the backend
/// only includes for some kinds are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub recipient_user_id: UserId,
    /// Human-readable notification text.
    pub message: String,
    /// What kind of catalog event produced this notification.
    #[serde(default)]
    pub notification_type: NotificationKind,
    /// The project the notification refers to, when applicable.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// The comment the notification refers to, when applicable.
    #[serde(default)]
    pub comment_id: Option<CommentId>,
    /// Whether the recipient has read this notification.
    #[serde(default)]
    pub is_read: bool,
    /// When the notification was created.
    #[serde(with = "time::flexible")]
    pub created_at: DateTime<Utc>,
    /// Title of the referenced project, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    /// Body of the referenced comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    /// Display name of the commenting user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commenter_name: Option<String>,
    /// Display name of the approving user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_name: Option<String>,
    /// Reason supplied with a rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }
}

/// Sort notifications newest first, the order every consumer displays.
///
/// Ties on the timestamp fall back to the higher identifier first.
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn make_notification(id: i64, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: NotificationId::new(id),
            recipient_user_id: UserId::new(1),
            message: format!("notification {id}"),
            notification_type: NotificationKind::Comment,
            project_id: Some(ProjectId::new(10)),
            comment_id: None,
            is_read: false,
            created_at,
            project_title: None,
            comment_text: None,
            commenter_name: None,
            approver_name: None,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_deserialize_full_payload() {
        let json = r#"{
            "id": 42,
            "recipientUserId": 7,
            "message": "Alice commented on your project",
            "notificationType": "COMMENT",
            "projectId": 10,
            "commentId": 99,
            "isRead": false,
            "createdAt": "2024-05-12T10:30:00Z",
            "projectTitle": "Compiler Playground",
            "commenterName": "Alice"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.id, NotificationId::new(42));
        assert_eq!(n.recipient_user_id, UserId::new(7));
        assert_eq!(n.notification_type, NotificationKind::Comment);
        assert_eq!(n.comment_id, Some(CommentId::new(99)));
        assert_eq!(n.project_title.as_deref(), Some("Compiler Playground"));
        assert!(n.is_unread());
    }

    #[test]
    fn test_deserialize_minimal_payload() {
        let json = r#"{
            "id": 1,
            "recipientUserId": 2,
            "message": "Something happened",
            "createdAt": "2024-05-12T10:30:00"
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.notification_type, NotificationKind::Other);
        assert_eq!(n.project_id, None);
        assert!(!n.is_read);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let n = make_notification(1, Utc.with_ymd_and_hms(2024, 5, 12, 10, 30, 0).unwrap());
        let value = serde_json::to_value(&n).unwrap();
        assert!(value.get("recipientUserId").is_some());
        assert!(value.get("isRead").is_some());
        assert!(value.get("recipient_user_id").is_none());
        // Absent display fields are omitted entirely.
        assert!(value.get("projectTitle").is_none());
    }

    #[test]
    fn test_sort_newest_first_with_id_tiebreak() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 12, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 12, 11, 0, 0).unwrap();
        let mut items = vec![
            make_notification(1, t0),
            make_notification(3, t1),
            make_notification(2, t1),
        ];
        sort_newest_first(&mut items);
        let ids: Vec<i64> = items.iter().map(|n| n.id.value()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
