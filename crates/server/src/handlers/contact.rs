//! Contact form handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::json_body;
use crate::db::models::{ContactRequest, MessageResponse};
use crate::error::BareError;
use crate::services::ContactService;

/// Relay a contact-form message.
///
/// `POST /api/contact`
///
/// # Request Body
///
/// ```json
/// { "name": "Asha", "email": "asha@example.com", "message": "..." }
/// ```
///
/// # Response
///
/// - `200 OK` `{"message": "Email sent successfully"}`
/// - `400 Bad Request` `{"error": "All fields are required"}`
/// - `500 Internal Server Error` `{"error": "Failed to send email"}`
pub async fn submit(
    State(service): State<ContactService>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, BareError> {
    service.submit(json_body(payload)?).await?;
    Ok(Json(MessageResponse {
        message: "Email sent successfully".to_string(),
    }))
}
