//! SMTP mail transport.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{MailError, Mailer, OutgoingEmail};
use crate::config::MailConfig;

/// SMTP mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let from: Mailbox = config
            .sender()
            .parse()
            .map_err(|e| MailError::InvalidConfig(format!("Invalid from address: {}", e)))?;

        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(config.host.clone())
                .map_err(|e| MailError::InvalidConfig(format!("TLS configuration error: {}", e)))?;

            // Port 465 uses implicit TLS (SMTPS), other ports use STARTTLS
            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                    .map_err(|e| MailError::InvalidConfig(format!("SMTP relay error: {}", e)))?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| MailError::InvalidConfig(format!("SMTP relay error: {}", e)))?
                    .port(config.port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port)
        };

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, MailError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {}", email.to, e)))?;

        let mut builder = Message::builder().from(self.from.clone()).to(to);

        if let Some(reply_to) = email.reply_to.as_deref() {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => tracing::debug!(error = %e, "Skipping unparsable Reply-To"),
            }
        }

        builder
            .subject(email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html),
                    ),
            )
            .map_err(|e| MailError::SendFailed(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_config() -> MailConfig {
        MailConfig {
            use_tls: false,
            port: 25,
            ..MailConfig::default()
        }
    }

    fn email(to: &str, reply_to: Option<&str>) -> OutgoingEmail {
        OutgoingEmail {
            to: to.to_string(),
            reply_to: reply_to.map(str::to_string),
            subject: "Hello".to_string(),
            text: "plain".to_string(),
            html: "<p>html</p>".to_string(),
        }
    }

    #[test]
    fn test_mailer_creation_no_tls() {
        assert!(SmtpMailer::new(&plain_config()).is_ok());
    }

    #[test]
    fn test_invalid_from_address_rejected() {
        let config = MailConfig {
            from_address: "not an address".to_string(),
            ..plain_config()
        };
        assert!(matches!(
            SmtpMailer::new(&config),
            Err(MailError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_recipient_rejected() {
        let mailer = SmtpMailer::new(&plain_config()).unwrap();
        assert!(matches!(
            mailer.build_message(email("nobody", None)),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_bad_reply_to_is_skipped() {
        let mailer = SmtpMailer::new(&plain_config()).unwrap();
        let message = mailer
            .build_message(email("team@maharitage.in", Some("??")))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(!raw.contains("Reply-To"));
        assert!(raw.contains("multipart/alternative"));
    }
}
