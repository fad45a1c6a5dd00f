//! Common Test Utilities
//!
//! Shared fixtures for database-backed tests.

pub mod fixtures;

pub use fixtures::*;
