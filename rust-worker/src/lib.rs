//! Hookgate - webhook authenticity and capability-URL service.
//!
//! This library provides the shared modules of the `hookgate-web` binary:
//! - `auth`: the stateless core — HMAC-SHA256 webhook signature
//!   verification and signed capability URLs
//! - `web`: thin axum handlers mapping auth outcomes to HTTP responses
//! - `config`: environment configuration, consumed only at the edge
//!
//! ## Architecture
//!
//! ```text
//! Webhook  → Web Server → SignatureVerifier → accepted / rejected
//! GET /sign → UrlSigner → capability URL → GET /verify
//! ```

pub mod auth;
pub mod config;
pub mod web;

// Re-export commonly used types
pub use auth::{AuthError, SignatureVerifier, UrlSigner};
pub use config::Config;
pub use web::AppState;
