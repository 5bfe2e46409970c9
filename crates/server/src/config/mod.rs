//! Configuration module for the Maharitage API server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod app;
mod database;
mod mail;

pub use app::AppConfig;
pub use database::DatabaseConfig;
pub use mail::MailConfig;
