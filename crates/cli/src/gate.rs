//! Dashboard access gate.
//!
//! Resolves whether the locally stored credential still identifies a user.
//! The gate starts in [`GateState::Loading`] and settles exactly once, either
//! on the identity returned by the server or on a redirect to the login page.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::nav::Role;

pub const LOGIN_PATH: &str = "/login";

/// Source of the locally stored bearer token.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;

    fn clear(&self) -> Result<()>;
}

/// Resolves a bearer token to the identity behind it (`GET /api/auth/me`).
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<IdentityResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_email_verified: bool,
}

/// Envelope returned by the identity endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<UserIdentity>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Authenticated(UserIdentity),
    Redirected { to: &'static str },
}

impl GateState {
    fn redirect() -> Self {
        GateState::Redirected { to: LOGIN_PATH }
    }
}

pub struct DashboardGate<'a> {
    credentials: &'a dyn CredentialProvider,
    identity: &'a dyn IdentityLookup,
    state: GateState,
}

impl<'a> DashboardGate<'a> {
    pub fn new(credentials: &'a dyn CredentialProvider, identity: &'a dyn IdentityLookup) -> Self {
        Self {
            credentials,
            identity,
            state: GateState::Loading,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Settle the gate. Later calls return the settled state unchanged.
    pub async fn resolve(&mut self) -> &GateState {
        if self.state == GateState::Loading {
            self.state = self.check().await;
        }
        &self.state
    }

    async fn check(&self) -> GateState {
        let Some(token) = self.credentials.token() else {
            tracing::debug!("No stored token, redirecting to login");
            return GateState::redirect();
        };

        match self.identity.current_user(&token).await {
            Ok(IdentityResponse {
                success: true,
                data: Some(user),
                ..
            }) => {
                tracing::debug!(user_id = %user.id, role = %user.role, "Session resolved");
                GateState::Authenticated(user)
            }
            Ok(response) => {
                tracing::info!(
                    error = response.error.as_deref().unwrap_or("no identity returned"),
                    "Stored session rejected"
                );
                self.discard_token();
                GateState::redirect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Identity lookup failed");
                self.discard_token();
                GateState::redirect()
            }
        }
    }

    fn discard_token(&self) {
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "Failed to clear stored token");
        }
    }
}
