//! Route definitions for the PetFinder HTTP API.
//!
//! Routes are grouped by domain and mounted at the root, matching the
//! paths the web client already calls.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{build_cors_layer, request_logging};
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.storage.max_request_bytes();
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(account_routes())
        .merge(pet_routes())
        .merge(notification_routes())
        .merge(upload_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Registration, login and own profile
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::account::register))
        .route("/login", post(handlers::account::login))
        .route(
            "/profile",
            get(handlers::profile::show).put(handlers::profile::update),
        )
}

/// Listings, sightings and resolution
fn pet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pets",
            get(handlers::pet::list).post(handlers::pet::create),
        )
        .route("/pets/{id}", get(handlers::pet::details))
        .route("/pets/{id}/sightings", post(handlers::sighting::create))
        .route("/pets/{id}/resolve", patch(handlers::resolution::resolve))
        .route("/my-pets", get(handlers::pet::my_pets))
}

/// Notification inbox
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            patch(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notification::mark_read),
        )
}

/// Stored photos
fn upload_routes() -> Router<AppState> {
    Router::new().route("/uploads/{*key}", get(handlers::upload::serve))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
