//! User database queries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::models::{NewUser, User, UserRow};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_email_verified, \
     verification_token, verification_token_expiry, created_at, updated_at";

fn into_user(row: UserRow) -> AppResult<User> {
    User::try_from(row).map_err(AppError::Internal)
}

/// Insert a new account.
///
/// Returns `AppError::Conflict` when the email is already registered.
pub async fn insert_user(pool: &DbPool, user: &NewUser) -> AppResult<User> {
    let sql = format!(
        r#"
        INSERT INTO maharitage.users
            (id, name, email, password_hash, role, verification_token, verification_token_expiry)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {USER_COLUMNS}
        "#
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.verification_token)
        .bind(user.verification_token_expiry)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("An account with this email already exists".to_string())
            }
            other => AppError::Database(other),
        })?;

    into_user(row)
}

/// Get a user by email (already normalized by the caller).
pub async fn get_user_by_email(pool: &DbPool, email: &str) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM maharitage.users WHERE email = $1");

    sqlx::query_as::<_, UserRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?
        .map(into_user)
        .transpose()
}

/// Get a user by ID.
pub async fn get_user_by_id(pool: &DbPool, id: Uuid) -> AppResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM maharitage.users WHERE id = $1");

    sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(into_user)
        .transpose()
}

/// Replace the outstanding verification token of an unverified user.
///
/// Returns `false` when no unverified user with that ID exists.
pub async fn set_verification_token(
    pool: &DbPool,
    id: Uuid,
    digest: &str,
    expiry: DateTime<Utc>,
) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE maharitage.users
        SET verification_token = $2, verification_token_expiry = $3, updated_at = NOW()
        WHERE id = $1 AND is_email_verified = FALSE
        "#,
    )
    .bind(id)
    .bind(digest)
    .bind(expiry)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Consume a verification token in a single conditional update.
///
/// Only a row whose digest matches and whose expiry is strictly after `now`
/// is touched; it becomes verified and loses its token. Two concurrent calls
/// with the same token cannot both succeed.
pub async fn consume_verification_token(
    pool: &DbPool,
    digest: &str,
    now: DateTime<Utc>,
) -> AppResult<Option<User>> {
    let sql = format!(
        r#"
        UPDATE maharitage.users
        SET is_email_verified = TRUE,
            verification_token = NULL,
            verification_token_expiry = NULL,
            updated_at = NOW()
        WHERE verification_token = $1 AND verification_token_expiry > $2
        RETURNING {USER_COLUMNS}
        "#
    );

    sqlx::query_as::<_, UserRow>(&sql)
        .bind(digest)
        .bind(now)
        .fetch_optional(pool)
        .await?
        .map(into_user)
        .transpose()
}
