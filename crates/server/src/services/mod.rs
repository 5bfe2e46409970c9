//! Service layer for the Maharitage API server.
//!
//! Services encapsulate business logic and coordinate
//! between handlers, storage and the mail transport.

pub mod auth;
pub mod contact;

pub use auth::{AuthService, LoginOutcome};
pub use contact::ContactService;
