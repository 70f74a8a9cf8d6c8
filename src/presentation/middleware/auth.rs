//! Authentication Middleware
//!
//! Bearer token validation for member routes. The verified identity is
//! inserted as a [`CurrentMember`] request extension.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::application::services::verify_access_token;
use crate::domain::CurrentMember;
use crate::shared::error::{AppError, ErrorCode};
use crate::startup::AppState;

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that validates JWT access tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::Code(ErrorCode::Unauthorized))?;

    let member: CurrentMember = verify_access_token(&state.settings.jwt, token)?;
    tracing::Span::current().record("member_id", member.id);

    request.extensions_mut().insert(member);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
