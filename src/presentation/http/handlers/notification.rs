//! Notification Handlers

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::application::dto::response::NotificationResponse;
use crate::application::services::NotificationService;
use crate::domain::CurrentMember;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// The caller's most recent notifications, newest first
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(member): Extension<CurrentMember>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = state
        .notification_service()
        .get_recent_notifications(member)
        .await?;
    Ok(Json(notifications))
}
