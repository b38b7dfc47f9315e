//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the chat API under `/api` plus a root banner and a
//! health check. CORS is open; the frontend is served from elsewhere.

pub mod auth;
pub mod messages;
pub mod sessions;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Uploads larger than this are rejected before reaching the handler.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/api/session", post(sessions::create_session))
        .route("/api/sessions", get(sessions::list_sessions))
        .route(
            "/api/message",
            post(messages::post_message).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Funmi Backend Running"
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
