//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::{DrinkType, PostType};
use crate::shared::id;

/// Sign-up request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 64, message = "Password must be 8-64 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: String,

    #[serde(deserialize_with = "id::deserialize")]
    pub region_id: i64,

    pub birth_date: Option<NaiveDate>,

    #[serde(default)]
    pub favor_drinks: Vec<DrinkType>,

    pub image_url: Option<String>,
}

/// Sign-in request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Ask for a password reset link
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// `?token=` on the reset link
#[derive(Debug, Clone, Deserialize)]
pub struct ResetTokenQuery {
    pub token: String,
}

/// Set a new password with a reset token
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,

    #[validate(length(min = 8, max = 64, message = "Password must be 8-64 characters"))]
    pub new_password: String,
}

/// Change password while signed in
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 64, message = "Password must be 8-64 characters"))]
    pub new_password: String,
}

/// Update member profile; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "id::deserialize_option")]
    pub region_id: Option<i64>,

    pub favor_drinks: Option<Vec<DrinkType>>,

    pub alarm_enabled: Option<bool>,

    pub image_url: Option<String>,
}

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(deserialize_with = "id::deserialize")]
    pub drink_id: i64,

    #[serde(default)]
    pub post_type: PostType,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f32,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 tags are allowed"))]
    pub tags: Vec<String>,
}

/// Create comment request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(deserialize_with = "id::deserialize")]
    pub post_id: i64,

    #[validate(length(min = 1, max = 500, message = "Content must be 1-500 characters"))]
    pub content: String,

    #[serde(default)]
    pub anonymous: bool,
}

/// Drink registration request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[serde(deserialize_with = "id::deserialize")]
    pub region_id: i64,

    #[validate(length(min = 1, max = 100, message = "Drink name must be 1-100 characters"))]
    pub drink_name: String,

    #[serde(default)]
    pub drink_type: DrinkType,

    #[validate(range(min = 0, max = 100, message = "Degree must be between 0 and 100"))]
    pub degree: i32,

    #[validate(range(min = 0, max = 5, message = "Sweetness must be between 0 and 5"))]
    pub sweetness: i32,

    #[validate(range(min = 0, message = "Cost must not be negative"))]
    pub cost: i32,

    pub description: Option<String>,

    pub image_url: Option<String>,
}

/// Report a post
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationRequest {
    #[serde(deserialize_with = "id::deserialize")]
    pub post_id: i64,

    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    pub content: String,
}

/// `?drink=` for the drink-name post search
#[derive(Debug, Clone, Deserialize)]
pub struct DrinkSearchQuery {
    #[serde(default)]
    pub drink: String,
}

/// `?name=&prefix=` for the drink catalog search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub name: Option<String>,

    #[serde(default)]
    pub prefix: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::validate;

    fn post_request(rating: f32) -> CreatePostRequest {
        CreatePostRequest {
            drink_id: 1,
            post_type: PostType::Review,
            title: "Smooth".into(),
            content: "Goes well with pajeon".into(),
            rating,
            tags: vec![],
        }
    }

    #[test]
    fn test_rating_range() {
        assert!(validate(&post_request(4.5)).is_ok());
        assert!(validate(&post_request(5.5)).is_err());
        assert!(validate(&post_request(-1.0)).is_err());
    }

    #[test]
    fn test_sign_up_accepts_camel_case_and_string_ids() {
        let body: SignUpRequest = serde_json::from_str(
            r#"{
                "email": "kim@example.com",
                "password": "password123",
                "name": "kim",
                "regionId": "3",
                "favorDrinks": ["MAKGEOLLI", "SOJU"]
            }"#,
        )
        .unwrap();

        assert_eq!(body.region_id, 3);
        assert_eq!(
            body.favor_drinks,
            vec![DrinkType::Makgeolli, DrinkType::Soju]
        );
        assert!(validate(&body).is_ok());
    }

    #[test]
    fn test_comment_anonymous_defaults_false() {
        let body: CreateCommentRequest =
            serde_json::from_str(r#"{"postId": 10, "content": "nice"}"#).unwrap();
        assert!(!body.anonymous);
    }
}
