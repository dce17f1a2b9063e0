//! Endpoint handlers.
//!
//! Handlers are deliberately thin: verification and signing outcomes come
//! from the auth core, and the mapping to HTTP lives entirely here. A
//! rejected webhook is answered with 400 and the core's safe, static error
//! message; a rejected capability URL with 403. Neither secrets nor
//! payload bodies are ever logged.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::auth::{SignatureVerifier, UrlSigner};
use crate::Config;

/// Shared application state.
///
/// The verifier and signer are built once from explicit secrets; each is
/// absent when the corresponding secret is not configured.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Option<Arc<SignatureVerifier>>,
    pub signer: Option<Arc<UrlSigner>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let verifier = config
            .webhook_secret
            .as_ref()
            .map(|s| Arc::new(SignatureVerifier::new(s.as_bytes())));
        let signer = config.signed_url_secret.as_ref().map(|s| {
            Arc::new(UrlSigner::with_ttl(s.as_bytes(), config.signed_url_ttl_ms))
        });

        Self {
            config: Arc::new(config),
            verifier,
            signer,
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Acknowledgement for an accepted webhook or valid signed URL.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
}

/// Error body returned on rejection.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A freshly signed capability URL.
#[derive(Serialize)]
pub struct SignedUrlResponse {
    pub url: String,
}

fn reject(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhook
// =============================================================================

/// Webhook endpoint.
///
/// Verifies the `x-hub-signature-256` header against the raw body and
/// acknowledges. Any verification failure maps to 400 with the core's
/// error message; what happens after acceptance is up to downstream
/// consumers, not this server.
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let delivery = headers
        .get("x-github-delivery")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let event = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let signature = headers
        .get("x-hub-signature-256")
        .and_then(|v| v.to_str().ok());

    info!(
        delivery = %delivery,
        event = %event,
        payload_length = body.len(),
        has_signature = signature.is_some(),
        "webhook_received"
    );

    let Some(verifier) = &state.verifier else {
        warn!("webhook_secret_not_configured");
        return reject(
            StatusCode::SERVICE_UNAVAILABLE,
            "webhook verification is not configured",
        );
    };

    if let Err(e) = verifier.verify(&body, signature) {
        warn!(delivery = %delivery, reason = %e, "webhook_rejected");
        return reject(StatusCode::BAD_REQUEST, e.to_string());
    }

    info!(delivery = %delivery, event = %event, "webhook_verified");
    (StatusCode::OK, Json(WebhookResponse { ok: true })).into_response()
}

// =============================================================================
// Signed URLs
// =============================================================================

/// Query parameters for `/sign` and `/verify`.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

/// Sign the URL given in the `url` query parameter.
pub async fn sign_url(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Response {
    let Some(signer) = &state.signer else {
        warn!("signed_url_secret_not_configured");
        return reject(
            StatusCode::SERVICE_UNAVAILABLE,
            "URL signing is not configured",
        );
    };

    let target: Url = match query.url.parse() {
        Ok(u) => u,
        Err(_) => {
            warn!("sign_url_unparseable_target");
            return reject(StatusCode::BAD_REQUEST, "invalid target URL");
        }
    };

    let signed = signer.sign(&target);
    info!(path = %target.path(), "url_signed");

    (
        StatusCode::OK,
        Json(SignedUrlResponse {
            url: signed.to_string(),
        }),
    )
        .into_response()
}

/// Verify a previously signed URL given in the `url` query parameter.
pub async fn verify_url(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Response {
    let Some(signer) = &state.signer else {
        warn!("signed_url_secret_not_configured");
        return reject(
            StatusCode::SERVICE_UNAVAILABLE,
            "URL signing is not configured",
        );
    };

    let target: Url = match query.url.parse() {
        Ok(u) => u,
        Err(_) => {
            warn!("verify_url_unparseable_target");
            return reject(StatusCode::BAD_REQUEST, "invalid target URL");
        }
    };

    match signer.verify(&target) {
        Ok(()) => {
            info!(path = %target.path(), "signed_url_accepted");
            (StatusCode::OK, Json(WebhookResponse { ok: true })).into_response()
        }
        Err(e) => {
            warn!(path = %target.path(), reason = %e, "signed_url_rejected");
            reject(StatusCode::FORBIDDEN, e.to_string())
        }
    }
}
