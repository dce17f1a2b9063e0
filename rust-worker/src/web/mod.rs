//! Web server module: the thin calling layer around the auth core.
//!
//! This layer only:
//! - Pulls the raw payload, signature header, or target URL out of the
//!   request
//! - Calls the stateless auth core
//! - Maps the typed outcome to a status code and JSON body
//!
//! No business logic lives here; a verified webhook is simply acknowledged.

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{
    github_webhook, health, sign_url, verify_url, AppState, ErrorResponse, HealthResponse,
    SignedUrlResponse, WebhookResponse,
};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(github_webhook))
        .route("/sign", get(sign_url))
        .route("/verify", get(verify_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
