//! Database models for the Maharitage API server.

pub mod user;

pub use user::*;
