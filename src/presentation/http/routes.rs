//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, track_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let size = state.db.size();
    let idle = state.db.num_idle() as u32;
    metrics::update_db_pool_stats(
        idle,
        size.saturating_sub(idle),
        state.settings.database.max_connections,
    );

    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics::gather_metrics(),
    )
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(member_routes(state.clone()))
        // Public to read, members only to delete
        .route(
            "/posts/{post_id}",
            get(handlers::post::get_post).merge(
                delete(handlers::post::delete_post)
                    .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
            ),
        )
}

/// Routes open to anonymous callers
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/members/signup", post(handlers::member::sign_up))
        .route("/members/signin", post(handlers::member::sign_in))
        .route("/members/refresh", post(handlers::member::refresh))
        .route("/members/signout", post(handlers::member::sign_out))
        .route(
            "/members/request-password-reset",
            post(handlers::member::request_password_reset),
        )
        .route(
            "/members/password-reset",
            get(handlers::member::verify_reset_token).post(handlers::member::reset_password),
        )
        .route("/search/tags", post(handlers::search::search_by_tags))
        .route("/search/drink", post(handlers::search::search_by_drink))
        .route(
            "/posts/{post_id}/comments",
            get(handlers::comment::get_comments),
        )
        .route("/regions", get(handlers::drink::get_regions))
        .route(
            "/regions/{region_id}/drinks",
            get(handlers::drink::get_region_drinks),
        )
        .route("/drinks/{drink_id}", get(handlers::drink::get_drink))
}

/// Routes that need a signed-in member
fn member_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/members",
            get(handlers::member::get_member_info).post(handlers::member::update_member_info),
        )
        .route(
            "/members/password-change",
            post(handlers::member::change_password),
        )
        .route(
            "/notifications",
            get(handlers::notification::get_notifications),
        )
        .route("/posts", post(handlers::post::create_post))
        .route("/comments", post(handlers::comment::create_comment))
        .route(
            "/comments/{comment_id}",
            delete(handlers::comment::delete_comment),
        )
        .route(
            "/tags/{tag_name}/follow",
            post(handlers::tag::follow_tag).delete(handlers::tag::unfollow_tag),
        )
        .route("/tags/follows", get(handlers::tag::get_followed_tags))
        .route(
            "/registrations",
            post(handlers::registration::register_drink).get(handlers::registration::get_pending),
        )
        .route(
            "/registrations/{registration_id}/approve",
            post(handlers::registration::approve),
        )
        .route(
            "/declarations",
            post(handlers::declaration::declare_post).get(handlers::declaration::get_pending),
        )
        .route(
            "/declarations/{declaration_id}/approve",
            post(handlers::declaration::approve),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
