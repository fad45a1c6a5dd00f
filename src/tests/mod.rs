//! Crate-level tests that need a real database.

pub mod common;
mod database;
mod property;
