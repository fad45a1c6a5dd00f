//! Database Module
//!
//! SQLite storage for characters, their links to catalog entries and the
//! derived attribute overlay. Operations are grouped into extension traits
//! implemented on [`Database`]:
//!
//! - [`CharacterOps`]: characters, base attributes, overlays
//! - [`EquipmentOps`]: equipment catalog and equipped items
//! - [`ClassOps`]: class catalog, class levels, progression tables
//! - [`ArmorOps`]: armor catalog and worn armor
//!
//! Functions that must share a caller's transaction take a
//! `&mut SqliteConnection` and live next to the trait they belong to.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::core::error::{Result, SheetError};

mod armor;
mod characters;
mod classes;
mod equipment;
pub mod migrations;
pub mod models;

pub use armor::*;
pub use characters::*;
pub use classes::*;
pub use equipment::*;
pub use models::*;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "charsheet.db";

/// Handle to the SQLite pool. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open (creating if needed) the database in `data_dir` with default
    /// settings and apply pending migrations.
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::with_config(data_dir, &DatabaseConfig::default()).await
    }

    pub async fn with_config(data_dir: &Path, config: &DatabaseConfig) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(DATABASE_FILE);

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;

        tracing::info!(path = %path.display(), "Database opened");

        Ok(Self { pool, path })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Reject descriptions the presentation layer cannot store.
pub(crate) fn validate_description(description: Option<&str>) -> Result<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(SheetError::validation(
            "description",
            format!("longer than {} characters", MAX_DESCRIPTION_LEN),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SheetError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Catalog bonus fields outside this range are treated as malformed.
pub(crate) fn validate_bonus(field: &str, value: i32) -> Result<()> {
    if !(-MAX_BONUS..=MAX_BONUS).contains(&value) {
        return Err(SheetError::validation(
            field,
            format!("{} is outside -{}..={}", value, MAX_BONUS, MAX_BONUS),
        ));
    }
    Ok(())
}

const MAX_DESCRIPTION_LEN: usize = 255;
const MAX_BONUS: i32 = 1000;
