//! HTTP handlers for the Maharitage API.
//!
//! This module contains all route handlers organized by domain.

pub mod auth;
pub mod contact;
pub mod health;

pub use health::{api_health, health_check};

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::{AppError, AppResult};

/// Unwrap a JSON body, turning extractor rejections into `AppError`.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}
