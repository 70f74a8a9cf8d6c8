//! Response DTOs
//!
//! Data structures for API response bodies. Each is built from a domain
//! value by an explicit conversion; IDs are rendered as strings.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    CommentRecord, Declaration, DrinkRecord, DrinkType, Member, Notification, NotificationKind,
    PostRecord, PostType, Region, Registration, Role, Tag,
};

/// Authentication tokens response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// Member profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub region_id: String,
    pub name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub favor_drinks: Vec<DrinkType>,
    pub role: Role,
    pub alarm_enabled: bool,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            region_id: member.region_id.to_string(),
            name: member.name,
            email: member.email,
            birth_date: member.birth_date,
            favor_drinks: member.favor_drinks,
            role: member.role,
            alarm_enabled: member.alarm_enabled,
            image_url: member.image_url,
            created_at: member.created_at.to_rfc3339(),
        }
    }
}

/// Region response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponse {
    pub id: String,
    pub place_name: String,
}

impl From<Region> for RegionResponse {
    fn from(region: Region) -> Self {
        Self {
            id: region.id.to_string(),
            place_name: region.place_name,
        }
    }
}

/// Drink response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrinkResponse {
    pub id: String,
    pub region_id: String,
    pub place_name: String,
    pub name: String,
    pub drink_type: DrinkType,
    pub degree: i32,
    pub sweetness: i32,
    pub cost: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<DrinkRecord> for DrinkResponse {
    fn from(record: DrinkRecord) -> Self {
        let drink = record.drink;
        Self {
            id: drink.id.to_string(),
            region_id: drink.region_id.to_string(),
            place_name: record.place_name,
            name: drink.name,
            drink_type: drink.drink_type,
            degree: drink.degree,
            sweetness: drink.sweetness,
            cost: drink.cost,
            description: drink.description,
            image_url: drink.image_url,
        }
    }
}

/// Tag response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: String,
    pub tag_name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            tag_name: tag.tag_name,
        }
    }
}

/// Post response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    pub rating: f32,
    pub view_count: i32,
    pub drink: DrinkResponse,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostResponse {
    /// Build from a stored post and the tags attached to it.
    pub fn from_record(record: PostRecord, tags: Vec<Tag>) -> Self {
        let post = record.post;
        Self {
            id: post.id.to_string(),
            member_id: post.member_id.to_string(),
            member_name: record.member_name,
            post_type: post.post_type,
            title: post.title,
            content: post.content,
            rating: post.rating,
            view_count: post.view_count,
            drink: DrinkResponse::from(record.drink),
            tags: tags.into_iter().map(|t| t.tag_name).collect(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

/// Notification response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub post_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub content: String,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            post_id: notification.post_id.map(|id| id.to_string()),
            kind: notification.kind,
            content: notification.content,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}

/// Comment response; anonymous comments carry no author
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub member_id: Option<String>,
    pub member_name: Option<String>,
    pub content: String,
    pub anonymous: bool,
    pub created_at: String,
}

impl From<CommentRecord> for CommentResponse {
    fn from(record: CommentRecord) -> Self {
        let comment = record.comment;
        let (member_id, member_name) = if comment.anonymous {
            (None, None)
        } else {
            (
                Some(comment.member_id.to_string()),
                Some(record.member_name),
            )
        };

        Self {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            member_id,
            member_name,
            content: comment.content,
            anonymous: comment.anonymous,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: String,
    pub member_id: String,
    pub region_id: String,
    pub drink_name: String,
    pub drink_type: DrinkType,
    pub degree: i32,
    pub sweetness: i32,
    pub cost: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub approved: bool,
    pub created_at: String,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            id: registration.id.to_string(),
            member_id: registration.member_id.to_string(),
            region_id: registration.region_id.to_string(),
            drink_name: registration.drink_name,
            drink_type: registration.drink_type,
            degree: registration.degree,
            sweetness: registration.sweetness,
            cost: registration.cost,
            description: registration.description,
            image_url: registration.image_url,
            approved: registration.approved,
            created_at: registration.created_at.to_rfc3339(),
        }
    }
}

/// Declaration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationResponse {
    pub id: String,
    pub post_id: String,
    pub member_id: String,
    pub content: String,
    pub approved: bool,
    pub created_at: String,
}

impl From<Declaration> for DeclarationResponse {
    fn from(declaration: Declaration) -> Self {
        Self {
            id: declaration.id.to_string(),
            post_id: declaration.post_id.to_string(),
            member_id: declaration.member_id.to_string(),
            content: declaration.content,
            approved: declaration.approved,
            created_at: declaration.created_at.to_rfc3339(),
        }
    }
}

/// Generic message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, NotificationEvent};
    use chrono::Utc;

    #[test]
    fn test_notification_response_uses_type_key() {
        let notification =
            Notification::from_event(1, 2, None, &NotificationEvent::DeclarationUpheld);
        let json = serde_json::to_value(NotificationResponse::from(notification)).unwrap();

        assert_eq!(json["type"], "DECLARATION");
        assert_eq!(json["id"], "1");
        assert!(json["postId"].is_null());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_anonymous_comment_hides_author() {
        let record = CommentRecord {
            comment: Comment {
                id: 1,
                post_id: 2,
                member_id: 3,
                content: "nice".into(),
                anonymous: true,
                created_at: Utc::now(),
            },
            member_name: "kim".into(),
        };

        let response = CommentResponse::from(record);
        assert_eq!(response.member_id, None);
        assert_eq!(response.member_name, None);
    }
}
