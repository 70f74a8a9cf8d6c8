//! Application Error Types
//!
//! Centralized error handling with Axum integration.
//!
//! Business failures carry a named [`ErrorCode`]; the response is the
//! mapped status with the code's message as a plain-text body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Named business error conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MemberNotFound,
    PostNotFound,
    DrinkNotFound,
    RegionNotFound,
    TagNotFound,
    CommentNotFound,
    RegistrationNotFound,
    DeclarationNotFound,
    NotFollowing,
    EmailNotFound,
    LoginFail,
    InvalidRefreshToken,
    InvalidResetToken,
    RegistrationAlreadyApproved,
    DeclarationAlreadyApproved,
    InvalidSort,
    EmailAlreadyExists,
    AlreadyFollowing,
    Unauthorized,
    TokenExpired,
    AccessDenied,
}

impl ErrorCode {
    /// HTTP status this code is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MemberNotFound
            | Self::PostNotFound
            | Self::DrinkNotFound
            | Self::RegionNotFound
            | Self::TagNotFound
            | Self::CommentNotFound
            | Self::RegistrationNotFound
            | Self::DeclarationNotFound
            | Self::NotFollowing => StatusCode::NOT_FOUND,
            Self::EmailNotFound
            | Self::LoginFail
            | Self::InvalidRefreshToken
            | Self::InvalidResetToken
            | Self::RegistrationAlreadyApproved
            | Self::DeclarationAlreadyApproved
            | Self::InvalidSort => StatusCode::BAD_REQUEST,
            Self::EmailAlreadyExists | Self::AlreadyFollowing => StatusCode::CONFLICT,
            Self::Unauthorized | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
        }
    }

    /// Human-readable message, also used as the response body.
    pub fn message(&self) -> &'static str {
        match self {
            Self::MemberNotFound => "Member not found.",
            Self::PostNotFound => "Post not found.",
            Self::DrinkNotFound => "Drink not found.",
            Self::RegionNotFound => "Region not found.",
            Self::TagNotFound => "Tag not found.",
            Self::CommentNotFound => "Comment not found.",
            Self::RegistrationNotFound => "Registration not found.",
            Self::DeclarationNotFound => "Declaration not found.",
            Self::NotFollowing => "You are not following this tag.",
            Self::EmailNotFound => "No member is registered with this email.",
            Self::LoginFail => "Email or password does not match.",
            Self::InvalidRefreshToken => "Refresh token is invalid or expired.",
            Self::InvalidResetToken => "Password reset token is invalid or expired.",
            Self::RegistrationAlreadyApproved => "Registration has already been approved.",
            Self::DeclarationAlreadyApproved => "Declaration has already been approved.",
            Self::InvalidSort => "Unsupported sort property.",
            Self::EmailAlreadyExists => "Email is already registered.",
            Self::AlreadyFollowing => "You are already following this tag.",
            Self::Unauthorized => "Authentication is required.",
            Self::TokenExpired => "Access token has expired.",
            Self::AccessDenied => "You do not have permission to perform this action.",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Code(ErrorCode),

    #[error("{0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        AppError::Code(code)
    }
}

impl AppError {
    /// The named code, if this is a business error.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AppError::Code(code) => Some(*code),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Code(code) => (code.status(), code.message().to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, message).into_response()
    }
}
