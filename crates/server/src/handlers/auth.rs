//! Authentication API handlers.
//!
//! Every response uses the `{"success": ..}` envelope; failures are
//! rendered by [`AppError`](crate::error::AppError).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};

use super::json_body;
use crate::db::models::{
    ApiResponse, LoginRequest, ResendVerificationRequest, SignupRequest, UserProfile,
    VerifyEmailRequest,
};
use crate::error::{AppError, AppResult};
use crate::services::AuthService;
use crate::session::extract_session_token;

fn set_cookie(value: String) -> AppResult<[(header::HeaderName, HeaderValue); 1]> {
    let value = HeaderValue::from_str(&value)
        .map_err(|e| AppError::Internal(format!("Invalid cookie header: {}", e)))?;
    Ok([(header::SET_COOKIE, value)])
}

/// Register a new account.
///
/// `POST /api/auth/signup`
///
/// # Request Body
///
/// ```json
/// { "name": "Asha", "email": "asha@example.com", "password": "..." }
/// ```
///
/// # Response
///
/// `201 Created` with the new (unverified) user in `data`.
pub async fn signup(
    State(service): State<AuthService>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
    let user = service.signup(json_body(payload)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            message: Some(
                "Account created. Please check your email to verify your account.".to_string(),
            ),
            token: None,
            data: Some(user),
        }),
    ))
}

/// Verify an email address.
///
/// `POST /api/auth/verify-email`
///
/// # Request Body
///
/// ```json
/// { "token": "<token from the verification link>" }
/// ```
///
/// # Response
///
/// - `200 OK` `{"success": true, "message": "Email verified successfully"}`
/// - `400 Bad Request` when the token is unknown, used or expired
pub async fn verify_email(
    State(service): State<AuthService>,
    payload: Result<Json<VerifyEmailRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    let request = json_body(payload).map_err(|_| AppError::InvalidOrExpiredToken)?;
    service.verify_email(&request.token).await?;
    Ok(Json(ApiResponse::message("Email verified successfully")))
}

/// Mail a fresh verification link.
///
/// `POST /api/auth/resend-verification`
///
/// Answers identically whether or not the address has a pending account.
pub async fn resend_verification(
    State(service): State<AuthService>,
    payload: Result<Json<ResendVerificationRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    let request = json_body(payload)?;
    service.resend_verification(&request.email).await?;
    Ok(Json(ApiResponse::message(
        "If an unverified account exists for this email, a new verification link has been sent.",
    )))
}

/// Log in and start a session.
///
/// `POST /api/auth/login`
///
/// Sets the `auth-token` cookie and also returns the token in the body for
/// clients that keep it in local storage.
pub async fn login(
    State(service): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let outcome = service.login(json_body(payload)?).await?;
    let cookie = set_cookie(service.session_cookie(&outcome.token))?;

    Ok((
        cookie,
        Json(ApiResponse {
            success: true,
            message: Some("Logged in successfully".to_string()),
            token: Some(outcome.token),
            data: Some(outcome.user),
        }),
    ))
}

/// End the session.
///
/// `POST /api/auth/logout`
///
/// Always expires the `auth-token` cookie, whatever the caller's state.
pub async fn logout(State(service): State<AuthService>) -> AppResult<impl IntoResponse> {
    let cookie = set_cookie(service.clear_cookie())?;
    Ok((cookie, Json(ApiResponse::message("Logged out successfully"))))
}

/// Current user.
///
/// `GET /api/auth/me`
///
/// Reads the credential from `Authorization: Bearer <token>` or the
/// `auth-token` cookie.
///
/// # Response
///
/// ```json
/// { "success": true, "data": { "id": "...", "name": "Asha", "role": "user", ... } }
/// ```
pub async fn me(
    State(service): State<AuthService>,
    headers: HeaderMap,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let token = extract_session_token(&headers);
    let user = service.current_user(token.as_deref()).await?;
    Ok(Json(ApiResponse::data(user)))
}
