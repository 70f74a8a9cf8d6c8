//! Request Validation API Tests
//!
//! Invalid bodies are rejected before any storage access.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

use one_drink_today::domain::Role;

use crate::common::{access_token, TestApp};

#[test_case(json!({"email": "not-an-email", "password": "password123", "name": "kim", "regionId": "1"}) ; "invalid email")]
#[test_case(json!({"email": "kim@example.com", "password": "short", "name": "kim", "regionId": "1"}) ; "short password")]
#[test_case(json!({"email": "kim@example.com", "password": "password123", "name": "", "regionId": 1}) ; "empty name")]
#[tokio::test]
async fn test_sign_up_rejects_invalid_body(body: serde_json::Value) {
    let app = TestApp::new();

    let response = app.post_json("/api/members/signup", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_post_rejects_out_of_range_rating() {
    let app = TestApp::new();
    let token = access_token(1, Role::User, 30);

    let body = json!({
        "drinkId": "3",
        "title": "Great",
        "content": "Smooth",
        "rating": 7.5,
        "tags": []
    });

    let response = app.post_json_auth("/api/posts", body, &token).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "rating: Rating must be between 0 and 5");
}

#[tokio::test]
async fn test_create_comment_rejects_empty_content() {
    let app = TestApp::new();
    let token = access_token(1, Role::User, 30);

    let body = json!({"postId": 10, "content": ""});

    let response = app.post_json_auth("/api/comments", body, &token).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
