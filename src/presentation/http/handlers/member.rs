//! Member Handlers
//!
//! Sign-up, sign-in, token refresh, password management and profile.

use axum::{
    extract::{Extension, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::application::dto::request::{
    PasswordChangeRequest, PasswordResetEmailRequest, PasswordResetRequest, ResetTokenQuery,
    SignInRequest, SignUpRequest, UpdateMemberRequest,
};
use crate::application::dto::response::{MemberResponse, MessageResponse, TokenResponse};
use crate::application::services::{AuthService, MemberService};
use crate::domain::CurrentMember;
use crate::presentation::middleware::cors::REFRESH_TOKEN_HEADER;
use crate::shared::error::{AppError, ErrorCode};
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Read the opaque refresh token from its header
fn refresh_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Code(ErrorCode::InvalidRefreshToken))
}

/// Register a new member
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    validate(&body)?;

    let member = state.auth_service().sign_up(body).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Sign in with email and password
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate(&body)?;

    let tokens = state
        .auth_service()
        .sign_in(&body.email, &body.password)
        .await?;
    Ok(Json(tokens))
}

/// Rotate the refresh token and issue a new access token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    let token = refresh_token(&headers)?;

    let tokens = state.auth_service().refresh_access_token(token).await?;
    Ok(Json(tokens))
}

/// Revoke the refresh token
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = refresh_token(&headers)?;

    state.auth_service().sign_out(token).await?;
    Ok(Json(MessageResponse::new("Signed out.")))
}

/// Send a password reset link
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate(&body)?;

    state
        .auth_service()
        .request_password_reset(&body.email)
        .await?;
    Ok(Json(MessageResponse::new("Password reset link sent.")))
}

/// Check a reset link before showing the reset form
pub async fn verify_reset_token(
    State(state): State<AppState>,
    Query(query): Query<ResetTokenQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service().verify_reset_token(&query.token).await?;
    Ok(Json(MessageResponse::new("Reset token is valid.")))
}

/// Set a new password with a reset token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate(&body)?;

    state
        .auth_service()
        .reset_password(&body.token, &body.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password has been reset.")))
}

/// Change the caller's password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Json(body): Json<PasswordChangeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate(&body)?;

    state
        .auth_service()
        .change_password(member, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password has been changed.")))
}

/// Get the caller's profile
pub async fn get_member_info(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
) -> Result<Json<MemberResponse>, AppError> {
    let profile = state.member_service().get_member_info(member).await?;
    Ok(Json(profile))
}

/// Update the caller's profile
pub async fn update_member_info(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Json(body): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    validate(&body)?;

    let profile = state
        .member_service()
        .update_member_info(member, body)
        .await?;
    Ok(Json(profile))
}
