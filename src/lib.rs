/// charsheet - d20 character sheet engine
///
/// Stores characters, their equipment, class levels and worn armor in
/// SQLite, and keeps derived ability scores consistent as items change.

pub mod config;
pub mod core;
pub mod database;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
