//! Outgoing mail.
//!
//! Services hand a rendered [`OutgoingEmail`] to a [`Mailer`]; the SMTP
//! implementation lives in [`smtp`], message bodies in [`templates`].

mod smtp;
mod templates;

pub use smtp::SmtpMailer;
pub use templates::{ContactEmailContent, VerificationEmailContent};

use async_trait::async_trait;
use thiserror::Error;

/// Email sending error
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A fully rendered message with plain-text and HTML alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every message; fails every send when `failing` is set.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub(crate) sent: Mutex<Vec<OutgoingEmail>>,
        pub(crate) failing: bool,
    }

    impl RecordingMailer {
        pub(crate) fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub(crate) fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
            if self.failing {
                return Err(MailError::SendFailed("connection refused".to_string()));
            }
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }
}
