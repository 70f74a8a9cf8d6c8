//! CORS

use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsSettings;

/// Header carrying the refresh token on refresh and sign-out
pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

/// Browser access for the configured origins, or for every origin when
/// none are configured. Unparseable origins are skipped with a warning.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    let refresh = HeaderName::from_static(REFRESH_TOKEN_HEADER);

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, refresh.clone()])
        .expose_headers([refresh])
        .max_age(Duration::from_secs(60 * 60))
}
