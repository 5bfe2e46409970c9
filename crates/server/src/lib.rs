//! Maharitage API Server Library
//!
//! This crate provides the HTTP API behind the Maharitage heritage site:
//!
//! - **Accounts**: Signup with email verification, login and logout
//! - **Sessions**: Signed bearer tokens carried in the `auth-token` cookie
//! - **Email Verification**: Single-use tokens stored only as SHA-256 digests
//! - **Contact Relay**: Validate contact-form submissions and forward them by email
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from environment variables
//! - [`db`]: Database connectivity, models and queries
//! - [`error`]: Custom error types with Axum integration
//! - [`handlers`]: HTTP route handlers
//! - [`mail`]: Outgoing mail transport and templates
//! - [`services`]: Business logic for accounts and the contact relay
//! - [`store`]: Storage abstraction over the user table
//! - [`state`]: Shared application state
//!
//! ## Example
//!
//! ```ignore
//! use maharitage_server::{
//!     config::{AppConfig, DatabaseConfig},
//!     db::create_pool,
//!     state::AppState,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app_config = AppConfig::from_env()?;
//!     let db_config = DatabaseConfig::from_env()?;
//!     let db_pool = create_pool(&db_config).await?;
//!     let state = AppState::new(db_pool, Arc::new(app_config));
//!     // ... build and run server
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod result_ext;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use error::{AppError, AppResult};
pub use result_ext::ResultExt;
