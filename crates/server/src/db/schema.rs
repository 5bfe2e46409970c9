//! Schema bootstrap for the `maharitage` PostgreSQL schema.

use crate::db::DbPool;
use crate::error::AppResult;

const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE SCHEMA IF NOT EXISTS maharitage",
    r#"
    CREATE TABLE IF NOT EXISTS maharitage.users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
        is_email_verified BOOLEAN NOT NULL DEFAULT FALSE,
        verification_token TEXT,
        verification_token_expiry TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CHECK ((verification_token IS NULL) = (verification_token_expiry IS NULL))
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS users_verification_token_idx
        ON maharitage.users (verification_token)
        WHERE verification_token IS NOT NULL
    "#,
];

/// Create the schema and tables if they do not exist yet.
pub async fn ensure_schema(pool: &DbPool) -> AppResult<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database schema ready");
    Ok(())
}
