//! Search API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_empty_tag_list_returns_empty_page() {
    let app = TestApp::new();

    let response = app.post_json("/api/search/tags", json!([])).await;

    assert_eq!(response.status, StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["content"], json!([]));
    assert_eq!(page["totalElements"], 0);
    assert_eq!(page["page"], 0);
    assert_eq!(page["size"], 10);
}

#[tokio::test]
async fn test_blank_tags_are_ignored() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/search/tags?page=2&size=5", json!(["", "   "]))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let page: Value = response.json();
    assert_eq!(page["totalElements"], 0);
    assert_eq!(page["page"], 2);
    assert_eq!(page["size"], 5);
}

#[tokio::test]
async fn test_unknown_sort_field() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/search/tags?sort=title,desc", json!(["makgeolli"]))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Unsupported sort property.");
}

#[tokio::test]
async fn test_blank_drink_search() {
    let app = TestApp::new();

    let response = app
        .send("POST", "/api/search/drink?drink=%20%20", None, &[], None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "drink: Search term is required");
}
