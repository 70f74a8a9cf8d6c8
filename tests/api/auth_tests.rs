//! Authentication API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use one_drink_today::domain::Role;

use crate::common::{access_token, TestApp};

const REFRESH_TOKEN: &str = "Refresh-Token";

#[tokio::test]
async fn test_member_route_without_token() {
    let app = TestApp::new();

    let response = app.get("/api/members").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "Authentication is required.");
}

#[tokio::test]
async fn test_member_route_with_garbage_token() {
    let app = TestApp::new();

    let response = app.get_auth("/api/notifications", "not-a-jwt").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token() {
    let app = TestApp::new();
    let token = access_token(1, Role::User, -120);

    let response = app.get_auth("/api/members", &token).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "Access token has expired.");
}

#[tokio::test]
async fn test_admin_listing_denied_to_members() {
    let app = TestApp::new();
    let token = access_token(1, Role::User, 30);

    for uri in ["/api/registrations", "/api/declarations"] {
        let response = app.get_auth(uri, &token).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{}", uri);
    }
}

#[tokio::test]
async fn test_delete_post_needs_token() {
    let app = TestApp::new();

    let response = app.send("DELETE", "/api/posts/1", None, &[], None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_without_header() {
    let app = TestApp::new();

    let response = app
        .send("POST", "/api/members/refresh", None, &[], None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Refresh token is invalid or expired.");
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let app = TestApp::new();
    app.seed_refresh_token("seeded-refresh-token", 42, Role::User)
        .await;
    let headers = [(REFRESH_TOKEN, "seeded-refresh-token")];

    let response = app
        .send("POST", "/api/members/refresh", None, &headers, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["tokenType"], "Bearer");
    assert_ne!(body["refreshToken"], "seeded-refresh-token");

    // The issued access token is accepted by member routes.
    let access = body["accessToken"].as_str().unwrap();
    let listing = app.get_auth("/api/registrations", access).await;
    assert_eq!(listing.status, StatusCode::FORBIDDEN);

    // The old refresh token is single-use.
    let replay = app
        .send("POST", "/api/members/refresh", None, &headers, None)
        .await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_out_revokes_token() {
    let app = TestApp::new();
    app.seed_refresh_token("signout-token", 7, Role::Admin)
        .await;
    let headers = [(REFRESH_TOKEN, "signout-token")];

    let response = app
        .send("POST", "/api/members/signout", None, &headers, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let replay = app
        .send("POST", "/api/members/refresh", None, &headers, None)
        .await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_reset_token() {
    let app = TestApp::new();

    let response = app
        .get("/api/members/password-reset?token=never-issued")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.text(),
        "Password reset token is invalid or expired."
    );
}
