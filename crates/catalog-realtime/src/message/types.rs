//! Inbound and outbound WebSocket frame definitions.

use serde::{Deserialize, Serialize};

use catalog_entity::notification::Notification;

/// Frames sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to a topic.
    Subscribe {
        /// Topic name.
        topic: String,
    },
    /// Unsubscribe from a topic.
    Unsubscribe {
        /// Topic name.
        topic: String,
    },
    /// Pong response to a server ping.
    Pong {
        /// Echoed timestamp.
        timestamp: i64,
    },
}

/// Frames sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Subscription confirmed.
    Subscribed {
        /// Topic name.
        topic: String,
    },
    /// Notification delivery on a subscribed topic.
    Notification {
        /// The notification payload, flattened into the frame.
        #[serde(flatten)]
        notification: Notification,
    },
    /// Server liveness probe; the client echoes the timestamp back.
    Ping {
        /// Millisecond timestamp.
        timestamp: i64,
    },
    /// Server-reported subscription or protocol failure.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

impl ClientFrame {
    /// Encode the frame as its JSON wire form.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Decode a server frame from its JSON wire form.
pub fn decode_server_frame(raw: &str) -> Result<ServerFrame, serde_json::Error> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use catalog_core::types::NotificationId;
    use catalog_entity::notification::NotificationKind;

    use super::*;

    #[test]
    fn test_encode_subscribe_frame() {
        let frame = ClientFrame::Subscribe {
            topic: "notifications:7".to_string(),
        };
        assert_eq!(
            frame.encode(),
            r#"{"type":"subscribe","topic":"notifications:7"}"#
        );
    }

    #[test]
    fn test_decode_subscribed_frame() {
        let frame =
            decode_server_frame(r#"{"type":"subscribed","topic":"notifications:7"}"#).unwrap();
        match frame {
            ServerFrame::Subscribed { topic } => assert_eq!(topic, "notifications:7"),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_decode_notification_frame_with_flattened_payload() {
        let raw = r#"{
            "type": "notification",
            "id": 3,
            "recipientUserId": 7,
            "message": "Bob reacted to your comment",
            "notificationType": "REACTION",
            "isRead": false,
            "createdAt": "2024-05-12T10:30:00Z"
        }"#;
        let frame = decode_server_frame(raw).unwrap();
        match frame {
            ServerFrame::Notification { notification } => {
                assert_eq!(notification.id, NotificationId::new(3));
                assert_eq!(notification.notification_type, NotificationKind::Reaction);
                assert!(notification.is_unread());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_decode_ping_and_echo_pong() {
        let frame = decode_server_frame(r#"{"type":"ping","timestamp":1715508600000}"#).unwrap();
        let ServerFrame::Ping { timestamp } = frame else {
            panic!("expected ping");
        };
        let pong = ClientFrame::Pong { timestamp };
        assert_eq!(pong.encode(), r#"{"type":"pong","timestamp":1715508600000}"#);
    }

    #[test]
    fn test_decode_rejects_unknown_frame_type() {
        assert!(decode_server_frame(r#"{"type":"presence","userId":7}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(decode_server_frame("{not json").is_err());
    }

    #[test]
    fn test_decode_rejects_notification_frame_missing_required_fields() {
        assert!(decode_server_frame(r#"{"type":"notification","id":3}"#).is_err());
    }
}
