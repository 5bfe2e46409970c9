//! Storage abstraction over user accounts.
//!
//! Services talk to [`UserStore`] rather than a pool directly so that the
//! account flows can be exercised without a running PostgreSQL.

mod postgres;

#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::{NewUser, User};
use crate::error::AppResult;

/// Persistence operations needed by the account flows.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account; a duplicate email is `AppError::Conflict`.
    async fn insert_user(&self, user: &NewUser) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Replace the outstanding verification token of an unverified user.
    async fn set_verification_token(
        &self,
        id: Uuid,
        digest: &str,
        expiry: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Atomically match `digest` against an unexpired token, mark the owner
    /// verified and clear the token. Returns the updated user, if any.
    async fn consume_verification_token(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;
}
