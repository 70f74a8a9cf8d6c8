//! Comment Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateCommentRequest;
use crate::application::dto::response::CommentResponse;
use crate::application::services::CommentService;
use crate::domain::CurrentMember;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Comment on a post
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    validate(&body)?;

    let comment = state.comment_service().create_comment(member, body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Comments on a post
pub async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = state.comment_service().get_comments(post_id).await?;
    Ok(Json(comments))
}

/// Delete a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .comment_service()
        .delete_comment(member, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
