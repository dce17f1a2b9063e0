//! Configuration module for environment variable parsing.
//!
//! All configuration is read here, at the edge. The auth core never
//! touches the environment; secrets are handed to it explicitly when the
//! application state is built.

use std::env;

use crate::auth::DEFAULT_TTL_MS;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret for webhook signature verification
    pub webhook_secret: Option<String>,

    /// Shared secret for signed capability URLs
    pub signed_url_secret: Option<String>,

    /// Signed URL validity in milliseconds
    pub signed_url_ttl_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            webhook_secret: non_empty(env::var("WEBHOOK_SECRET").ok()),

            signed_url_secret: non_empty(env::var("SIGNED_URL_SECRET").ok()),

            signed_url_ttl_ms: env::var("SIGNED_URL_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
        }
    }
}

/// Treat unset and blank variables the same way.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_filters_blank() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(
            non_empty(Some("topsecret".to_string())),
            Some("topsecret".to_string())
        );
    }
}
