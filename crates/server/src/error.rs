//! Error types for the Maharitage API server.
//!
//! This module provides custom error types that implement `IntoResponse`
//! for seamless integration with Axum handlers. Every failure is rendered
//! as the JSON envelope `{"success": false, "error": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::mail::MailError;

/// Message shown to clients for failures whose details stay server-side.
const GENERIC_SERVER_ERROR: &str = "Something went wrong. Please try again later.";

/// Application-level errors for the API server.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more required request fields were empty or absent
    #[error("All fields are required")]
    MissingFields,

    /// Verification token unknown, already used, or past its expiry
    #[error("Invalid or expired verification token")]
    InvalidOrExpiredToken,

    /// The mail transport rejected or failed to deliver a message
    #[error("Failed to send email: {0}")]
    EmailSendFailed(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Email/password pair did not match an account
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but the email address has not been verified yet
    #[error("Please verify your email before logging in")]
    EmailNotVerified,

    /// Missing, malformed or expired session credential
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    /// Conflict error (e.g., duplicate account)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFields
            | AppError::InvalidOrExpiredToken
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::EmailNotVerified => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::EmailSendFailed(_)
            | AppError::Database(_)
            | AppError::Config(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    ///
    /// Server-side faults are logged here and replaced by a generic message.
    pub fn client_message(&self) -> String {
        match self {
            AppError::MissingFields
            | AppError::InvalidOrExpiredToken
            | AppError::InvalidCredentials
            | AppError::EmailNotVerified => self.to_string(),
            AppError::Validation(msg) | AppError::Unauthorized(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::EmailSendFailed(msg) => {
                tracing::error!(error = %msg, "Email send failed");
                "Failed to send email".to_string()
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                GENERIC_SERVER_ERROR.to_string()
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                GENERIC_SERVER_ERROR.to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!(error = %e, "Serialization error");
                GENERIC_SERVER_ERROR.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                GENERIC_SERVER_ERROR.to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.client_message(),
        }));

        (status, body).into_response()
    }
}

/// Error rendered as a bare `{"error": "..."}` body.
///
/// The contact relay predates the `success` envelope and its clients only
/// read the `error` field.
#[derive(Debug)]
pub struct BareError(pub AppError);

impl From<AppError> for BareError {
    fn from(err: AppError) -> Self {
        BareError(err)
    }
}

impl IntoResponse for BareError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        (status, Json(json!({ "error": self.0.client_message() }))).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::InvalidConfig(msg) => AppError::Config(msg),
            other => AppError::EmailSendFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_is_bad_request() {
        let err = AppError::InvalidOrExpiredToken;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Invalid or expired verification token");
    }

    #[test]
    fn test_database_error_hides_details() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), GENERIC_SERVER_ERROR);
    }

    #[test]
    fn test_mail_error_conversion() {
        let err: AppError = MailError::SendFailed("connection refused".to_string()).into();
        assert!(matches!(err, AppError::EmailSendFailed(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: AppError = MailError::InvalidConfig("bad relay".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::Validation("Invalid email".to_string());
        assert_eq!(err.to_string(), "Validation error: Invalid email");
        assert_eq!(err.client_message(), "Invalid email");
    }
}
