//! Application configuration for the Maharitage API server.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Development signing secret, used only when `MAHARITAGE_SESSION_SECRET` is unset.
pub(crate) const DEV_SESSION_SECRET: &str = "maharitage-dev-session-secret-change-me";

/// Longest accepted lifetime for sessions and verification tokens (one year).
pub const MAX_TTL_HOURS: i64 = 8760;

/// Application configuration loaded from environment variables.
///
/// Environment variables are prefixed with `MAHARITAGE_`:
/// - `MAHARITAGE_HOST`: Server bind address (default: "0.0.0.0")
/// - `MAHARITAGE_PORT`: Server port (default: 8080)
/// - `MAHARITAGE_DEBUG`: Enable debug mode (default: false)
/// - `MAHARITAGE_SERVER_NAME`: Server name for identification
/// - `MAHARITAGE_PUBLIC_URL`: Base URL of the site, used in verification links
/// - `MAHARITAGE_SESSION_SECRET`: HMAC secret for session tokens
/// - `MAHARITAGE_SESSION_TTL_HOURS`: Session lifetime (default: 24)
/// - `MAHARITAGE_VERIFICATION_TOKEN_TTL_HOURS`: Verification token lifetime (default: 24)
/// - `MAHARITAGE_COOKIE_SECURE`: Mark the session cookie `Secure` (default: false)
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable debug mode
    #[serde(default)]
    pub debug: bool,

    /// Server name for identification
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Public base URL of the site (no trailing slash)
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Secret used to sign session tokens
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Session lifetime in hours
    #[serde(default = "default_ttl_hours")]
    pub session_ttl_hours: i64,

    /// Verification token lifetime in hours
    #[serde(default = "default_ttl_hours")]
    pub verification_token_ttl_hours: i64,

    /// Send the session cookie only over HTTPS
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_server_name() -> String {
    "maharitage-server".to_string()
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_ttl_hours() -> i64 {
    24
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MAHARITAGE_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("MAHARITAGE_").from_env::<AppConfig>()
    }

    /// Reject settings the server cannot run with.
    ///
    /// TTLs must lie in `1..=MAX_TTL_HOURS`. Outside debug mode a session
    /// secret is mandatory.
    pub fn validate(&self) -> AppResult<()> {
        for (name, hours) in [
            ("MAHARITAGE_SESSION_TTL_HOURS", self.session_ttl_hours),
            (
                "MAHARITAGE_VERIFICATION_TOKEN_TTL_HOURS",
                self.verification_token_ttl_hours,
            ),
        ] {
            if !(1..=MAX_TTL_HOURS).contains(&hours) {
                return Err(AppError::Config(format!(
                    "{} must be between 1 and {} hours, got {}",
                    name, MAX_TTL_HOURS, hours
                )));
            }
        }

        if !self.debug && self.session_secret.as_deref().unwrap_or_default().is_empty() {
            return Err(AppError::Config(
                "MAHARITAGE_SESSION_SECRET must be set unless MAHARITAGE_DEBUG is enabled"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Get the server bind address as a string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Session signing secret, falling back to the development secret.
    pub fn session_secret(&self) -> &str {
        match self.session_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => DEV_SESSION_SECRET,
        }
    }

    /// Link a user follows to verify their email address.
    pub fn verification_link(&self, raw_token: &str) -> String {
        format!(
            "{}/verify-email?token={}",
            self.public_url.trim_end_matches('/'),
            raw_token
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            server_name: default_server_name(),
            public_url: default_public_url(),
            session_secret: None,
            session_ttl_hours: default_ttl_hours(),
            verification_token_ttl_hours: default_ttl_hours(),
            cookie_secure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
        assert_eq!(config.verification_token_ttl_hours, 24);
    }

    fn production() -> AppConfig {
        AppConfig {
            session_secret: Some("s3cret".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_validate_accepts_defaults_with_secret() {
        assert!(production().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ttls() {
        for hours in [0, -24, MAX_TTL_HOURS + 1, 1_000_000_000_000] {
            let session = AppConfig {
                session_ttl_hours: hours,
                ..production()
            };
            assert!(matches!(session.validate(), Err(AppError::Config(_))), "{hours}");

            let verification = AppConfig {
                verification_token_ttl_hours: hours,
                ..production()
            };
            assert!(
                matches!(verification.validate(), Err(AppError::Config(_))),
                "{hours}"
            );
        }
    }

    #[test]
    fn test_validate_requires_secret_outside_debug() {
        let missing = AppConfig::default();
        assert!(matches!(missing.validate(), Err(AppError::Config(_))));

        let empty = AppConfig {
            session_secret: Some(String::new()),
            ..AppConfig::default()
        };
        assert!(empty.validate().is_err());

        let debug = AppConfig {
            debug: true,
            ..AppConfig::default()
        };
        assert!(debug.validate().is_ok());
    }

    #[test]
    fn test_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_session_secret_fallback() {
        let mut config = AppConfig::default();
        assert_eq!(config.session_secret(), DEV_SESSION_SECRET);

        config.session_secret = Some(String::new());
        assert_eq!(config.session_secret(), DEV_SESSION_SECRET);

        config.session_secret = Some("s3cret".to_string());
        assert_eq!(config.session_secret(), "s3cret");
    }

    #[test]
    fn test_verification_link_strips_trailing_slash() {
        let config = AppConfig {
            public_url: "https://maharitage.in/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.verification_link("abc123"),
            "https://maharitage.in/verify-email?token=abc123"
        );
    }
}
