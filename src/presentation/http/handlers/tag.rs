//! Tag Follow Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::response::TagResponse;
use crate::application::services::TagService;
use crate::domain::CurrentMember;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub async fn follow_tag(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Path(tag_name): Path<String>,
) -> Result<(StatusCode, Json<TagResponse>), AppError> {
    let tag = state.tag_service().follow_tag(member, &tag_name).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn unfollow_tag(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Path(tag_name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.tag_service().unfollow_tag(member, &tag_name).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_followed_tags(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = state.tag_service().get_followed_tags(member).await?;
    Ok(Json(tags))
}
