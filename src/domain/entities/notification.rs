//! Notification entity and repository trait.
//!
//! Maps to the `notifications` table in the database schema.
//!
//! A notification is built from a [`NotificationEvent`]: the event decides
//! both the stored [`NotificationKind`] and the rendered text, so a new
//! event variant cannot be added without deciding how it reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Content used when an anonymous member comments.
pub const ANONYMOUS_COMMENT_CONTENT: &str = "A new comment was posted on your post.";

/// Number of notifications returned by the recent-notifications query.
pub const RECENT_NOTIFICATION_LIMIT: i64 = 20;

/// Closed set of notification kinds, stored as VARCHAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Comment,
    Follow,
    Removed,
    Declaration,
    Registration,
}

impl NotificationKind {
    /// Parse the database representation; unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "COMMENT" => Some(Self::Comment),
            "FOLLOW" => Some(Self::Follow),
            "REMOVED" => Some(Self::Removed),
            "DECLARATION" => Some(Self::Declaration),
            "REGISTRATION" => Some(Self::Registration),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "COMMENT",
            Self::Follow => "FOLLOW",
            Self::Removed => "REMOVED",
            Self::Declaration => "DECLARATION",
            Self::Registration => "REGISTRATION",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something that happened and should be told to a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// Someone commented on the recipient's post; `None` when anonymous.
    Comment { commenter: Option<String> },
    /// A post was published with a tag the recipient follows.
    TagFollow { tag_name: String },
    /// The recipient's post was removed after a report.
    PostRemoved,
    /// A post the recipient reported was removed.
    DeclarationUpheld,
    /// The recipient's drink registration was approved.
    RegistrationApproved { drink_name: String },
}

impl NotificationEvent {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Comment { .. } => NotificationKind::Comment,
            Self::TagFollow { .. } => NotificationKind::Follow,
            Self::PostRemoved => NotificationKind::Removed,
            Self::DeclarationUpheld => NotificationKind::Declaration,
            Self::RegistrationApproved { .. } => NotificationKind::Registration,
        }
    }

    /// Text stored with the notification.
    pub fn render(&self) -> String {
        match self {
            Self::Comment { commenter: None } => ANONYMOUS_COMMENT_CONTENT.to_string(),
            Self::Comment {
                commenter: Some(name),
            } => format!("{} commented on your post.", name),
            Self::TagFollow { tag_name } => {
                format!("A new post was published with the {} tag.", tag_name)
            }
            Self::PostRemoved => "Your post was reported and has been removed.".to_string(),
            Self::DeclarationUpheld => {
                "The post you reported was reviewed and has been removed.".to_string()
            }
            Self::RegistrationApproved { drink_name } => {
                format!("Your registration for {} has been approved.", drink_name)
            }
        }
    }
}

/// A message addressed to one member. Never modified after creation.
///
/// Maps to the `notifications` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - member_id: BIGINT NOT NULL REFERENCES members(id)
/// - post_id: BIGINT NULL
/// - kind: VARCHAR(20) NOT NULL
/// - content: TEXT NOT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - INDEX (member_id, created_at DESC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    /// Recipient
    pub member_id: i64,
    /// Related post, if any
    pub post_id: Option<i64>,
    pub kind: NotificationKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a notification for `member_id` from an event.
    pub fn from_event(
        id: i64,
        member_id: i64,
        post_id: Option<i64>,
        event: &NotificationEvent,
    ) -> Self {
        Self {
            id,
            member_id,
            post_id,
            kind: event.kind(),
            content: event.render(),
            created_at: Utc::now(),
        }
    }
}

/// Repository trait for Notification data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;

    /// The `limit` most recent notifications for a member, newest first.
    async fn find_recent_by_member(
        &self,
        member_id: i64,
        limit: i64,
    ) -> Result<Vec<Notification>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(NotificationEvent::Comment { commenter: None }, NotificationKind::Comment ; "anonymous comment")]
    #[test_case(NotificationEvent::Comment { commenter: Some("kim".into()) }, NotificationKind::Comment ; "named comment")]
    #[test_case(NotificationEvent::TagFollow { tag_name: "rice-wine".into() }, NotificationKind::Follow ; "tag follow")]
    #[test_case(NotificationEvent::PostRemoved, NotificationKind::Removed ; "removed")]
    #[test_case(NotificationEvent::DeclarationUpheld, NotificationKind::Declaration ; "declaration")]
    #[test_case(NotificationEvent::RegistrationApproved { drink_name: "Andong Soju".into() }, NotificationKind::Registration ; "registration")]
    fn test_event_kind(event: NotificationEvent, expected: NotificationKind) {
        assert_eq!(event.kind(), expected);
    }

    #[test]
    fn test_anonymous_comment_is_generic() {
        let event = NotificationEvent::Comment { commenter: None };
        assert_eq!(event.render(), ANONYMOUS_COMMENT_CONTENT);
    }

    #[test]
    fn test_named_comment_contains_name() {
        let event = NotificationEvent::Comment {
            commenter: Some("JohnDoe".into()),
        };
        assert!(event.render().contains("JohnDoe"));
    }

    #[test]
    fn test_tag_follow_names_tag() {
        let event = NotificationEvent::TagFollow {
            tag_name: "rice-wine".into(),
        };
        assert!(event.render().contains("rice-wine"));
    }

    #[test]
    fn test_registration_names_drink() {
        let event = NotificationEvent::RegistrationApproved {
            drink_name: "Andong Soju".into(),
        };
        assert!(event.render().contains("Andong Soju"));
    }

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [
            NotificationKind::Comment,
            NotificationKind::Follow,
            NotificationKind::Removed,
            NotificationKind::Declaration,
            NotificationKind::Registration,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("LIKE"), None);
    }

    #[test]
    fn test_from_event_sets_kind_and_content() {
        let event = NotificationEvent::PostRemoved;
        let notification = Notification::from_event(1, 2, Some(3), &event);

        assert_eq!(notification.member_id, 2);
        assert_eq!(notification.post_id, Some(3));
        assert_eq!(notification.kind, NotificationKind::Removed);
        assert_eq!(notification.content, event.render());
    }
}
