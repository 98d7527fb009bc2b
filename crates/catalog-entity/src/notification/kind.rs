//! Notification kind enumeration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What kind of catalog event produced a notification.
///
/// The backend may grow new kinds before this client learns about them;
/// unrecognized values degrade to [`NotificationKind::Other`] instead of
/// failing deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// Someone commented on a project.
    Comment,
    /// A project was approved.
    Approval,
    /// A project was rejected.
    Rejection,
    /// Someone reacted to a comment.
    Reaction,
    /// A project was submitted for review.
    Submit,
    /// A kind this client does not recognize.
    #[default]
    #[serde(other)]
    Other,
}

impl NotificationKind {
    /// Return the kind as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "COMMENT",
            Self::Approval => "APPROVAL",
            Self::Rejection => "REJECTION",
            Self::Reaction => "REACTION",
            Self::Submit => "SUBMIT",
            Self::Other => "OTHER",
        }
    }

    /// Return a human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Comment => "Comment",
            Self::Approval => "Approval",
            Self::Rejection => "Rejection",
            Self::Reaction => "Reaction",
            Self::Submit => "Submission",
            Self::Other => "Notification",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "COMMENT" => Ok(Self::Comment),
            "APPROVAL" => Ok(Self::Approval),
            "REJECTION" => Ok(Self::Rejection),
            "REACTION" => Ok(Self::Reaction),
            "SUBMIT" => Ok(Self::Submit),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kind_roundtrip() {
        let json = serde_json::to_string(&NotificationKind::Approval).unwrap();
        assert_eq!(json, "\"APPROVAL\"");
        let back: NotificationKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NotificationKind::Approval);
    }

    #[test]
    fn test_unknown_kind_degrades_to_other() {
        let kind: NotificationKind = serde_json::from_str("\"MENTION\"").unwrap();
        assert_eq!(kind, NotificationKind::Other);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("comment".parse::<NotificationKind>().unwrap(), NotificationKind::Comment);
        assert!("mention".parse::<NotificationKind>().is_err());
    }
}
