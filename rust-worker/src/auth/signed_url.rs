//! Signed capability URLs.
//!
//! A signed URL carries an `expiry` query parameter (absolute Unix-epoch
//! milliseconds) and a `mac` parameter authenticating `path + "@" + expiry`.
//! The `@` separator cannot appear in the decimal expiry, so a signature
//! for one (path, expiry) pair can never validate another.
//!
//! Query parameters other than `mac` and `expiry` are deliberately NOT
//! covered by the MAC. Callers relying on other parameters for
//! authorization must account for this themselves; widening the MAC input
//! would break previously issued URLs and requires a versioned format
//! change.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::auth::compare::constant_time_compare;
use crate::auth::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Default signature validity: one minute.
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Issues and checks time-bounded, self-verifying URLs.
///
/// The secret is injected at construction and never read from process-wide
/// state. Signing and verification are pure functions of the URL, the
/// secret, and the supplied clock.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
    /// Signature validity in milliseconds.
    ttl_ms: u64,
}

impl UrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_ttl(secret, DEFAULT_TTL_MS)
    }

    pub fn with_ttl(secret: impl Into<Vec<u8>>, ttl_ms: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_ms,
        }
    }

    /// Create a signer with a random 32-byte secret.
    ///
    /// URLs signed by it only verify within the same process lifetime.
    pub fn with_random_secret() -> Self {
        use rand::Rng;
        let secret: [u8; 32] = rand::thread_rng().gen();
        Self::with_ttl(secret.to_vec(), DEFAULT_TTL_MS)
    }

    /// Sign `url`, stamping an expiry `ttl_ms` from the current wall clock.
    pub fn sign(&self, url: &Url) -> Url {
        self.sign_at(url, now_ms())
    }

    /// Sign `url` with the expiry computed from the supplied clock.
    ///
    /// Returns a new URL with the `expiry` and `mac` query parameters set;
    /// any existing `mac`/`expiry` parameters are overwritten and all other
    /// query parameters are left untouched. The caller's URL is not
    /// mutated.
    pub fn sign_at(&self, url: &Url, now_ms: u64) -> Url {
        let expiry = now_ms + self.ttl_ms;
        let mac = self.compute_mac(url.path(), expiry);

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "mac" && k != "expiry")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut signed = url.clone();
        signed.set_query(None);
        {
            let mut pairs = signed.query_pairs_mut();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("expiry", &expiry.to_string());
            pairs.append_pair("mac", &mac);
        }

        signed
    }

    /// Check a previously signed URL against the current wall clock.
    pub fn verify(&self, url: &Url) -> Result<(), AuthError> {
        self.verify_at(url, now_ms())
    }

    /// Check a previously signed URL against the supplied clock.
    ///
    /// The MAC is checked before the expiry, so a forged URL is reported as
    /// a mismatch even when it is also expired.
    pub fn verify_at(&self, url: &Url, now_ms: u64) -> Result<(), AuthError> {
        let mut expiry_raw = None;
        let mut mac = None;
        // Last occurrence wins, matching the overwrite semantics of signing.
        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "expiry" => expiry_raw = Some(v.into_owned()),
                "mac" => mac = Some(v.into_owned()),
                _ => {}
            }
        }

        let (expiry_raw, mac) = match (expiry_raw, mac) {
            (Some(e), Some(m)) if !e.is_empty() && !m.is_empty() => (e, m),
            _ => return Err(AuthError::MissingSignature),
        };

        let expiry: u64 = expiry_raw
            .parse()
            .map_err(|_| AuthError::MalformedSignature)?;

        let expected = self.compute_mac(url.path(), expiry);
        if !constant_time_compare(&expected, &mac) {
            return Err(AuthError::SignatureMismatch);
        }

        if now_ms > expiry {
            return Err(AuthError::ExpiredUrl);
        }

        Ok(())
    }

    /// HMAC-SHA256 over `path + "@" + expiry`, standard Base64 with every
    /// `+` rewritten to `-` (URLs decode `+` as a space). Padding `=` is
    /// passed through to the URL layer's own encoding.
    fn compute_mac(&self, path: &str, expiry: u64) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(format!("{path}@{expiry}").as_bytes());
        BASE64.encode(mac.finalize().into_bytes()).replace('+', "-")
    }
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("ttl_ms", &self.ttl_ms)
            .finish_non_exhaustive()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
