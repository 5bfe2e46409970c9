//! Database queries for the Maharitage API server.
//!
//! This module contains database query functions organized by domain.

pub mod user;
