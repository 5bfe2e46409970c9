//! Outgoing mail configuration.

use serde::Deserialize;

/// SMTP relay and addressing configuration.
///
/// Environment variables are prefixed with `MAIL_`:
/// - `MAIL_HOST`: SMTP relay host (default: "localhost")
/// - `MAIL_PORT`: SMTP port (default: 587; 465 selects implicit TLS)
/// - `MAIL_USERNAME` / `MAIL_PASSWORD`: Relay credentials (optional)
/// - `MAIL_USE_TLS`: Require TLS (default: true)
/// - `MAIL_FROM_ADDRESS`: Sender mailbox
/// - `MAIL_FROM_NAME`: Sender display name (default: "Maharitage")
/// - `MAIL_CONTACT_RECIPIENT`: Inbox that receives contact-form messages
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_true")]
    pub use_tls: bool,

    #[serde(default = "default_from_address")]
    pub from_address: String,

    #[serde(default = "default_from_name")]
    pub from_name: Option<String>,

    /// Contact-form inbox; the relay refuses to run without it
    #[serde(default)]
    pub contact_recipient: Option<String>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_from_address() -> String {
    "no-reply@maharitage.in".to_string()
}

fn default_from_name() -> Option<String> {
    Some("Maharitage".to_string())
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MAIL_`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("MAIL_").from_env::<MailConfig>()
    }

    /// `From` header value, with display name when configured.
    pub fn sender(&self) -> String {
        match self.from_name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.from_address),
            _ => self.from_address.clone(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            use_tls: true,
            from_address: default_from_address(),
            from_name: default_from_name(),
            contact_recipient: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MailConfig::default();
        assert_eq!(config.port, 587);
        assert!(config.use_tls);
        assert!(config.contact_recipient.is_none());
    }

    #[test]
    fn test_sender_with_and_without_name() {
        let mut config = MailConfig::default();
        assert_eq!(config.sender(), "Maharitage <no-reply@maharitage.in>");

        config.from_name = None;
        assert_eq!(config.sender(), "no-reply@maharitage.in");
    }
}
