//! Drink Registration Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::RegistrationRequest;
use crate::application::dto::response::{DrinkResponse, RegistrationResponse};
use crate::application::services::RegistrationService;
use crate::domain::CurrentMember;
use crate::shared::error::AppError;
use crate::shared::validation::validate;
use crate::startup::AppState;

/// Submit a drink for the catalog
pub async fn register_drink(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Json(body): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    validate(&body)?;

    let registration = state
        .registration_service()
        .register_drink(member, body)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// Pending registrations (admin)
pub async fn get_pending(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    let pending = state.registration_service().get_pending(member).await?;
    Ok(Json(pending))
}

/// Approve a registration (admin)
pub async fn approve(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
    Path(registration_id): Path<i64>,
) -> Result<Json<DrinkResponse>, AppError> {
    let drink = state
        .registration_service()
        .approve(member, registration_id)
        .await?;
    Ok(Json(drink))
}
