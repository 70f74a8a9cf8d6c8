//! Search Handlers

use axum::{
    extract::{Query, State},
    Json,
};

use crate::application::dto::request::DrinkSearchQuery;
use crate::application::dto::response::PostResponse;
use crate::application::services::SearchService;
use crate::shared::error::AppError;
use crate::shared::pagination::{Page, PageRequest};
use crate::startup::AppState;

/// Posts carrying any of the tag names in the body
pub async fn search_by_tags(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
    Json(tag_names): Json<Vec<String>>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    let posts = state
        .search_service()
        .search_by_tags(tag_names, page)
        .await?;
    Ok(Json(posts))
}

/// Posts about drinks whose name contains `?drink=`
pub async fn search_by_drink(
    State(state): State<AppState>,
    Query(query): Query<DrinkSearchQuery>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    let posts = state
        .search_service()
        .search_by_drink(&query.drink, page)
        .await?;
    Ok(Json(posts))
}
