//! Route definitions for the Shelfwire HTTP API.
//!
//! All REST routes are mounted under `/api`; the WebSocket upgrade lives
//! at `/ws`. The router receives `AppState` and passes it to all handlers
//! via Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(notification_routes())
        .merge(activity_routes())
        .merge(event_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Notification inbox endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route("/notifications/{id}", delete(handlers::notification::delete))
}

/// Activity feed endpoints
fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/activity/recent", get(handlers::activity::recent))
        .route("/activity/friends", get(handlers::activity::friends_feed))
        .route("/activity/user/{id}", get(handlers::activity::user_feed))
        .route(
            "/activity/clear-friends-feed",
            delete(handlers::activity::clear_friends_feed),
        )
        .route(
            "/activity/unhide-all",
            post(handlers::activity::unhide_all),
        )
        .route("/activity/{id}", delete(handlers::activity::hide))
}

/// Internal event trigger endpoints
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events/follow", post(handlers::events::follow))
        .route("/events/unfollow", post(handlers::events::unfollow))
        .route(
            "/events/review-posted",
            post(handlers::events::review_posted),
        )
        .route(
            "/events/review-liked",
            post(handlers::events::review_liked),
        )
        .route("/events/reply-liked", post(handlers::events::reply_liked))
        .route(
            "/events/review-replied",
            post(handlers::events::review_replied),
        )
        .route("/events/book-list", post(handlers::events::book_list))
        .route("/events/announce", post(handlers::events::announce))
}

/// Health check endpoint (no identity required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
