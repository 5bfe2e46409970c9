//! Account service: signup, email verification, login and session lookup.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::crypto::{digest_token, generate_token, hash_password, verify_password};
use crate::db::models::{LoginRequest, NewUser, Role, SignupRequest, User, UserProfile};
use crate::error::{AppError, AppResult};
use crate::mail::{Mailer, OutgoingEmail, VerificationEmailContent};
use crate::result_ext::ResultExt;
use crate::session::{clear_session_cookie, expiry_after, session_cookie, SessionSigner};
use crate::store::UserStore;

/// Shortest accepted password.
const MIN_PASSWORD_LEN: usize = 8;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserProfile,
}

/// Service for account operations.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    sessions: SessionSigner,
    config: Arc<AppConfig>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose structural check: one `@`, non-empty local part, dotted domain, no spaces.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

impl AuthService {
    /// Create a new account service.
    pub fn new(
        store: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        config: Arc<AppConfig>,
    ) -> Self {
        let sessions = SessionSigner::new(config.session_secret(), config.session_ttl_hours);
        Self {
            store,
            mailer,
            sessions,
            config,
        }
    }

    /// `Set-Cookie` value storing a freshly issued session token.
    pub fn session_cookie(&self, token: &str) -> String {
        session_cookie(token, self.sessions.ttl_seconds(), self.config.cookie_secure)
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn clear_cookie(&self) -> String {
        clear_session_cookie(self.config.cookie_secure)
    }

    fn new_verification_token(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<(String, String, DateTime<Utc>)> {
        let expiry = expiry_after(
            now,
            self.config.verification_token_ttl_hours,
            "verification token",
        )?;
        let raw = generate_token();
        let digest = digest_token(&raw);
        Ok((raw, digest, expiry))
    }

    async fn send_verification_email(&self, user: &User, raw_token: &str) {
        let link = self.config.verification_link(raw_token);
        let content = VerificationEmailContent::new(
            &user.name,
            &link,
            self.config.verification_token_ttl_hours,
        );

        let sent = self
            .mailer
            .send(OutgoingEmail {
                to: user.email.clone(),
                reply_to: None,
                subject: content.subject,
                text: content.text,
                html: content.html,
            })
            .await
            .log(format!("sending verification email to user {}", user.id));

        if sent.is_ok() {
            tracing::info!(user_id = %user.id, "Verification email sent");
        }
    }

    /// Register a new, unverified account and mail its verification link.
    ///
    /// A mail failure does not undo the signup; the user can ask for a
    /// new link through [`AuthService::resend_verification`].
    pub async fn signup(&self, request: SignupRequest) -> AppResult<UserProfile> {
        let name = request.name.trim();
        let email = normalize_email(&request.email);

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AppError::MissingFields);
        }
        if !is_valid_email(&email) {
            return Err(AppError::Validation(
                "Please provide a valid email address".to_string(),
            ));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let (raw_token, digest, expiry) = self.new_verification_token(Utc::now())?;
        let user = self
            .store
            .insert_user(&NewUser {
                name: name.to_string(),
                email,
                password_hash: hash_password(&request.password)?,
                role: Role::User,
                verification_token: digest,
                verification_token_expiry: expiry,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Account created");
        self.send_verification_email(&user, &raw_token).await;

        Ok(UserProfile::from(&user))
    }

    /// Consume a verification token.
    ///
    /// Unknown, already-used and expired tokens all yield
    /// `InvalidOrExpiredToken`; none of them touch any record.
    pub async fn verify_email(&self, raw_token: &str) -> AppResult<UserProfile> {
        self.verify_email_at(raw_token, Utc::now()).await
    }

    async fn verify_email_at(&self, raw_token: &str, now: DateTime<Utc>) -> AppResult<UserProfile> {
        if raw_token.is_empty() {
            return Err(AppError::InvalidOrExpiredToken);
        }

        let user = self
            .store
            .consume_verification_token(&digest_token(raw_token), now)
            .await?
            .ok_or(AppError::InvalidOrExpiredToken)?;

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(UserProfile::from(&user))
    }

    /// Issue and mail a new verification token for an unverified account.
    ///
    /// Unknown and already-verified addresses succeed silently.
    pub async fn resend_verification(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::MissingFields);
        }

        let Some(user) = self.store.find_by_email(&email).await? else {
            tracing::debug!("Verification resend requested for unknown email");
            return Ok(());
        };
        if user.is_email_verified {
            return Ok(());
        }

        let (raw_token, digest, expiry) = self.new_verification_token(Utc::now())?;
        if self
            .store
            .set_verification_token(user.id, &digest, expiry)
            .await?
        {
            self.send_verification_email(&user, &raw_token).await;
        }

        Ok(())
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginOutcome> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::MissingFields);
        }

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .filter(|u| verify_password(&request.password, &u.password_hash))
            .ok_or(AppError::InvalidCredentials)?;

        if !user.is_email_verified {
            return Err(AppError::EmailNotVerified);
        }

        let token = self.sessions.issue(&user, Utc::now())?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            token,
            user: UserProfile::from(&user),
        })
    }

    /// Resolve the user behind a bearer credential.
    pub async fn current_user(&self, token: Option<&str>) -> AppResult<UserProfile> {
        let token = token.ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;
        let claims = self.sessions.verify(token, Utc::now())?;

        let user = self
            .store
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        Ok(UserProfile::from(&user))
    }
}
