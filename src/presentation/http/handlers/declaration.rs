//! Post Report Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::DeclarationRequest;
use crate::application::dto::response::{DeclarationResponse, MessageResponse};
use crate::application::services::DeclarationService;
use crate::domain::CurrentMember;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Report a post
pub async fn declare_post(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Json(body): Json<DeclarationRequest>,
) -> Result<(StatusCode, Json<DeclarationResponse>), AppError> {
    validate(&body)?;

    let declaration = state
        .declaration_service()
        .declare_post(member, body)
        .await?;
    Ok((StatusCode::CREATED, Json(declaration)))
}

/// Pending reports (admin)
pub async fn get_pending(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
) -> Result<Json<Vec<DeclarationResponse>>, AppError> {
    let pending = state.declaration_service().get_pending(member).await?;
    Ok(Json(pending))
}

/// Uphold a report and remove the post (admin)
pub async fn approve(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Path(declaration_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .declaration_service()
        .approve(member, declaration_id)
        .await?;
    Ok(Json(MessageResponse::new("Post has been removed.")))
}
