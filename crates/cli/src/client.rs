//! HTTP client for the Maharitage API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::gate::{IdentityLookup, IdentityResponse, UserIdentity};

#[derive(Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ContactRequest<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub data: UserIdentity,
}

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B, action: &str) -> Result<Response> {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", action))
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let response = self
            .post("/api/auth/signup", &SignupRequest { name, email, password }, "signup")
            .await?;
        message_or_error(response, "sign up").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .post("/api/auth/login", &LoginRequest { email, password }, "login")
            .await?;
        if response.status().is_success() {
            let login: LoginResponse = response.json().await.context("Failed to parse login response")?;
            Ok(login)
        } else {
            Err(failure(response, "log in").await)
        }
    }

    pub async fn logout(&self) -> Result<()> {
        let response = self.post("/api/auth/logout", &json!({}), "logout").await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(failure(response, "log out").await)
        }
    }

    pub async fn verify_email(&self, token: &str) -> Result<String> {
        let response = self
            .post("/api/auth/verify-email", &json!({ "token": token }), "verify-email")
            .await?;
        message_or_error(response, "verify email").await
    }

    pub async fn resend_verification(&self, email: &str) -> Result<String> {
        let response = self
            .post(
                "/api/auth/resend-verification",
                &json!({ "email": email }),
                "resend-verification",
            )
            .await?;
        message_or_error(response, "resend verification").await
    }

    pub async fn contact(&self, name: &str, email: &str, message: &str) -> Result<String> {
        let response = self
            .post("/api/contact", &ContactRequest { name, email, message }, "contact")
            .await?;
        message_or_error(response, "send message").await
    }
}

#[async_trait]
impl IdentityLookup for ApiClient {
    async fn current_user(&self, token: &str) -> Result<IdentityResponse> {
        let response = self
            .http
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send identity request")?;

        // Rejections still carry the `{success:false, error}` envelope.
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<IdentityResponse>(&text) {
            Ok(body) if status.is_success() || !body.success => Ok(body),
            _ => bail!("Identity lookup failed: {} - {}", status, text),
        }
    }
}

async fn message_or_error(response: Response, action: &str) -> Result<String> {
    if response.status().is_success() {
        let body: Value = response.json().await?;
        Ok(body["message"].as_str().unwrap_or("OK").to_string())
    } else {
        Err(failure(response, action).await)
    }
}

async fn failure(response: Response, action: &str) -> anyhow::Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    anyhow::anyhow!("Failed to {}: {} - {}", action, status, error_message(&text))
}

/// Pull the `error` field out of a JSON error body, falling back to the raw text.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/contact"), "http://localhost:8080/api/contact");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"success":false,"error":"Invalid email or password"}"#),
            "Invalid email or password"
        );
        assert_eq!(error_message(r#"{"error":"All fields are required"}"#), "All fields are required");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_login_response_shape() {
        let body = r#"{"success":true,"message":"Login successful","token":"t","data":{"id":"1","name":"A","email":"a@b.com","role":"admin","isEmailVerified":true,"createdAt":"2024-01-01T00:00:00Z"}}"#;
        let login: LoginResponse = serde_json::from_str(body).unwrap();
        assert_eq!(login.token, "t");
        assert_eq!(login.data.role, crate::nav::Role::Admin);
    }
}
