use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserStore;
use crate::db::models::{NewUser, User};
use crate::db::queries::user as queries;
use crate::db::DbPool;
use crate::error::AppResult;

/// [`UserStore`] backed by the `maharitage.users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(&self, user: &NewUser) -> AppResult<User> {
        queries::insert_user(&self.pool, user).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        queries::get_user_by_email(&self.pool, email).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        queries::get_user_by_id(&self.pool, id).await
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        digest: &str,
        expiry: DateTime<Utc>,
    ) -> AppResult<bool> {
        queries::set_verification_token(&self.pool, id, digest, expiry).await
    }

    async fn consume_verification_token(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        queries::consume_verification_token(&self.pool, digest, now).await
    }
}
