//! Contact relay: validate a contact-form submission and forward it by email.

use std::sync::Arc;

use crate::db::models::ContactRequest;
use crate::error::{AppError, AppResult};
use crate::mail::{ContactEmailContent, Mailer, OutgoingEmail};
use crate::result_ext::ResultExt;

/// Service for the contact form.
#[derive(Clone)]
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    recipient: Option<String>,
}

impl ContactService {
    /// Create a new contact service.
    ///
    /// # Arguments
    ///
    /// * `mailer` - Outgoing mail transport
    /// * `recipient` - Inbox receiving contact messages (`MAIL_CONTACT_RECIPIENT`)
    pub fn new(mailer: Arc<dyn Mailer>, recipient: Option<String>) -> Self {
        Self { mailer, recipient }
    }

    /// Relay a submission to the configured inbox.
    ///
    /// Nothing is sent unless name, email and message are all non-blank.
    /// Transport failures surface as `EmailSendFailed` and are not retried.
    pub async fn submit(&self, request: ContactRequest) -> AppResult<()> {
        let name = request.name.trim();
        let email = request.email.trim();
        let message = request.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(AppError::MissingFields);
        }

        let recipient = self
            .recipient
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::Config("MAIL_CONTACT_RECIPIENT is not set".to_string()))?;

        let content = ContactEmailContent::new(name, email, message);
        self.mailer
            .send(OutgoingEmail {
                to: recipient.to_string(),
                reply_to: Some(email.to_string()),
                subject: content.subject,
                text: content.text,
                html: content.html,
            })
            .await
            .log("relaying contact message")
            .map_err(|e| AppError::EmailSendFailed(e.to_string()))?;

        tracing::info!(from = %email, "Contact message relayed");
        Ok(())
    }
}
