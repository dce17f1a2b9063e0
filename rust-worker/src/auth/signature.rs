//! Webhook signature verification.
//!
//! Trusted senders sign the raw payload with HMAC-SHA256 and present the
//! digest in an `x-hub-signature-256`-style header as
//! `sha256=<64 lowercase hex chars>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::compare::constant_time_compare;
use crate::auth::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Required prefix of a presented signature header.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Verifies inbound webhook payloads against a shared secret.
///
/// The secret is injected at construction and never read from process-wide
/// state. Each `verify` call is a pure function of its inputs; concurrent
/// calls share nothing.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify that `signature` is the HMAC-SHA256 of `payload` under this
    /// verifier's secret.
    ///
    /// The comparison runs in constant time; a rejection does not leak how
    /// many leading bytes of the digest matched.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), AuthError> {
        let signature = match signature {
            Some(s) if !s.is_empty() => s,
            _ => return Err(AuthError::MissingSignature),
        };

        if !signature.starts_with(SIGNATURE_PREFIX) {
            return Err(AuthError::MalformedSignature);
        }

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload);

        let expected = format!(
            "{}{}",
            SIGNATURE_PREFIX,
            hex::encode(mac.finalize().into_bytes())
        );

        if !constant_time_compare(&expected, signature) {
            return Err(AuthError::SignatureMismatch);
        }

        Ok(())
    }
}

// The secret must never appear in logs or debug output.
impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(payload);
        format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_verify_missing_signature() {
        let verifier = SignatureVerifier::new(b"topsecret".to_vec());
        assert_eq!(
            verifier.verify(b"payload", None),
            Err(AuthError::MissingSignature)
        );
        assert_eq!(
            verifier.verify(b"payload", Some("")),
            Err(AuthError::MissingSignature)
        );
    }

    #[test]
    fn test_verify_malformed_signature() {
        let verifier = SignatureVerifier::new(b"topsecret".to_vec());
        assert_eq!(
            verifier.verify(b"payload", Some("md5=deadbeef")),
            Err(AuthError::MalformedSignature)
        );
        assert_eq!(
            verifier.verify(b"payload", Some("deadbeef")),
            Err(AuthError::MalformedSignature)
        );
    }

    #[test]
    fn test_verify_valid_signature() {
        let verifier = SignatureVerifier::new(b"topsecret".to_vec());
        let payload = br#"{"action":"opened"}"#;
        assert_eq!(
            sign(b"topsecret", payload),
            "sha256=c8e1211e6d7cf6fa6e3e68f6ee51b98ca2654dde24d4dafde9fad4167df885a9"
        );
        assert!(verifier
            .verify(
                payload,
                Some("sha256=c8e1211e6d7cf6fa6e3e68f6ee51b98ca2654dde24d4dafde9fad4167df885a9")
            )
            .is_ok());
    }

    #[test]
    fn test_verify_github_documentation_vector() {
        // https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries
        let verifier = SignatureVerifier::new(b"It's a Secret to Everybody".to_vec());
        assert!(verifier
            .verify(
                b"Hello, World!",
                Some("sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17")
            )
            .is_ok());
    }

    #[test]
    fn test_verify_signature_from_different_payload() {
        let verifier = SignatureVerifier::new(b"topsecret".to_vec());
        // Digest of {"action":"closed"} presented against {"action":"opened"}.
        assert_eq!(
            verifier.verify(
                br#"{"action":"opened"}"#,
                Some("sha256=448ec4f16f8124692d744215f086e62fd0493258c5729a45adf6fa7d7b4bfce9")
            ),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn test_verify_single_bit_flip_rejected() {
        let secret = b"topsecret";
        let payload = br#"{"action":"opened"}"#;
        let good = sign(secret, payload);

        // Flip one bit in the payload.
        let mut flipped = payload.to_vec();
        flipped[0] ^= 0x01;
        let verifier = SignatureVerifier::new(secret.to_vec());
        assert_eq!(
            verifier.verify(&flipped, Some(&good)),
            Err(AuthError::SignatureMismatch)
        );

        // Flip one hex digit in the signature.
        let mut bad = good.into_bytes();
        let last = bad.len() - 1;
        bad[last] = if bad[last] == b'0' { b'1' } else { b'0' };
        let bad = String::from_utf8(bad).unwrap();
        assert_eq!(
            verifier.verify(payload, Some(&bad)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn test_verify_wrong_secret() {
        let payload = br#"{"action":"opened"}"#;
        let good = sign(b"topsecret", payload);
        let verifier = SignatureVerifier::new(b"othersecret".to_vec());
        assert_eq!(
            verifier.verify(payload, Some(&good)),
            Err(AuthError::SignatureMismatch)
        );
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let verifier = SignatureVerifier::new(b"topsecret".to_vec());
        let rendered = format!("{:?}", verifier);
        assert!(!rendered.contains("topsecret"));
    }
}
