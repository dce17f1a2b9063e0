//! Authenticity core: webhook signatures and signed capability URLs.
//!
//! Two independent, stateless operations share one MAC primitive:
//!
//! - [`SignatureVerifier`] recomputes HMAC-SHA256 over an inbound payload
//!   and accepts or rejects a presented `sha256=<hex>` header in constant
//!   time.
//! - [`UrlSigner`] stamps a URL with an `expiry` and a `mac` over
//!   path + expiry, yielding a self-verifying capability URL, and checks
//!   such URLs on the way back in.
//!
//! Secrets are injected at construction; nothing in this module reads
//! process-wide state, logs secret material, or retains data across calls.

pub mod compare;
pub mod error;
pub mod signature;
pub mod signed_url;

pub use compare::constant_time_compare;
pub use error::AuthError;
pub use signature::{SignatureVerifier, SIGNATURE_PREFIX};
pub use signed_url::{UrlSigner, DEFAULT_TTL_MS};
