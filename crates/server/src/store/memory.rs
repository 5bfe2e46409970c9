//! In-memory [`UserStore`] for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use super::UserStore;
use crate::db::models::{NewUser, User};
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub(crate) struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub(crate) fn snapshot(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Overwrite a stored user, keyed by ID.
    pub(crate) fn put(&self, user: User) {
        let mut users = self.users.lock().unwrap();
        users.retain(|u| u.id != user.id);
        users.push(user);
    }

    pub(crate) fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, new: &NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            email: new.email.clone(),
            password_hash: new.password_hash.clone(),
            role: new.role,
            is_email_verified: false,
            verification_token: Some(new.verification_token.clone()),
            verification_token_expiry: Some(new.verification_token_expiry),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.snapshot(email))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn set_verification_token(
        &self,
        id: Uuid,
        digest: &str,
        expiry: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users
            .iter_mut()
            .find(|u| u.id == id && !u.is_email_verified)
        {
            Some(user) => {
                user.verification_token = Some(digest.to_string());
                user.verification_token_expiry = Some(expiry);
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn consume_verification_token(
        &self,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let found = users.iter_mut().find(|u| {
            u.verification_token.as_deref() == Some(digest)
                && u.verification_token_expiry.is_some_and(|exp| exp > now)
        });

        Ok(found.map(|user| {
            user.is_email_verified = true;
            user.verification_token = None;
            user.verification_token_expiry = None;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}
