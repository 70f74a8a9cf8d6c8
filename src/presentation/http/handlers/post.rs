//! Post Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreatePostRequest;
use crate::application::dto::response::PostResponse;
use crate::application::services::PostService;
use crate::domain::CurrentMember;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Publish a post
pub async fn create_post(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    validate(&body)?;

    let post = state.post_service().create_post(member, body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Read a post
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.post_service().get_post(post_id).await?;
    Ok(Json(post))
}

/// Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.post_service().delete_post(member, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
