//! Cryptography module for the Maharitage API server.
//!
//! Provides single-use verification tokens and password hashing.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{digest_token, generate_token};
