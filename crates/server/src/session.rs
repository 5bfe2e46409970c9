//! Session credentials.
//!
//! A session is an HS256-signed token (`header.claims.signature`, base64url
//! without padding) carried either as `Authorization: Bearer <token>` or in
//! the `auth-token` cookie. There is no server-side session table; a token
//! is valid while its signature checks out and `exp` is in the future.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::db::models::{Role, User};
use crate::error::{AppError, AppResult};

/// Name of the cookie holding the session token.
pub const AUTH_COOKIE: &str = "auth-token";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    /// User ID
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

/// Issues and checks session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl_hours: i64,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_hours,
        }
    }

    /// Session lifetime in seconds, used for the cookie `Max-Age`.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_hours.saturating_mul(3600).max(0)
    }

    fn mac(&self) -> AppResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Config(format!("Invalid session secret: {}", e)))
    }

    /// Issue a token for `user`, valid from `now` for the configured TTL.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> AppResult<String> {
        let header = Header {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let expires_at = expiry_after(now, self.ttl_hours, "session")?;
        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{header_b64}.{claims_b64}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> AppResult<SessionClaims> {
        let invalid = || AppError::Unauthorized("Invalid or expired session".to_string());

        let mut parts = token.trim().split('.');
        let (Some(header_b64), Some(claims_b64), Some(sig_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let header: Header = URL_SAFE_NO_PAD
            .decode(header_b64)
            .ok()
            .and_then(|raw| serde_json::from_slice(&raw).ok())
            .ok_or_else(invalid)?;
        if header.alg != "HS256" {
            return Err(invalid());
        }

        let signature = URL_SAFE_NO_PAD.decode(sig_b64).map_err(|_| invalid())?;
        let mut mac = self.mac()?;
        mac.update(format!("{header_b64}.{claims_b64}").as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let claims: SessionClaims = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .ok()
            .and_then(|raw| serde_json::from_slice(&raw).ok())
            .ok_or_else(invalid)?;

        if claims.exp <= now.timestamp() {
            return Err(invalid());
        }

        Ok(claims)
    }
}

/// `now + ttl_hours`, or a configuration error when the TTL is not positive or overflows.
pub(crate) fn expiry_after(
    now: DateTime<Utc>,
    ttl_hours: i64,
    what: &str,
) -> AppResult<DateTime<Utc>> {
    Duration::try_hours(ttl_hours)
        .filter(|ttl| *ttl > Duration::zero())
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Config(format!("Invalid {} TTL: {} hours", what, ttl_hours)))
}

/// `Set-Cookie` value that stores the session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Extract the bearer credential from the `Authorization` header or the
/// `auth-token` cookie, in that order.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
