//! Error taxonomy for the authenticity core.

use thiserror::Error;

/// Terminal, non-retryable authenticity failures.
///
/// The inputs to a failed check are deterministic, so a mismatch is never
/// retried. Messages are static and safe to surface to callers: they never
/// contain secret bytes, payload contents, or the presented signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No signature value was supplied for verification.
    #[error("Signature is missing")]
    MissingSignature,

    /// Signature present but lacking the required prefix or format.
    #[error("Invalid signature format")]
    MalformedSignature,

    /// The recomputed MAC does not equal the presented value.
    #[error("Signature does not match event payload and secret")]
    SignatureMismatch,

    /// The current time exceeds the expiry embedded in a signed URL.
    #[error("Signed URL has expired")]
    ExpiredUrl,
}
