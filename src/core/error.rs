//! Error types for the character sheet engine.
//!
//! Integrity problems found while aggregating a single class or armor row are
//! downgraded to [`IntegrityWarning`]s by the aggregators; everything else
//! aborts the operation and propagates as a [`SheetError`].

use serde::Serialize;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// SQLite result codes that mean another writer holds the lock.
const SQLITE_BUSY: &str = "5";
const SQLITE_LOCKED: &str = "6";
const SQLITE_BUSY_SNAPSHOT: &str = "517";

#[derive(Error, Debug)]
pub enum SheetError {
    // =========================================================================
    // Lookup Errors
    // =========================================================================

    /// A character, definition or link does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of row that was looked up ("character", "equipment", ...)
        entity: &'static str,
        id: String,
    },

    // =========================================================================
    // Data Errors
    // =========================================================================

    /// Stored rows reference something missing or carry an unknown selector.
    #[error("Data integrity error: {message}")]
    DataIntegrity { message: String },

    /// Input or stored numeric fields are malformed.
    #[error("Validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    // =========================================================================
    // Concurrency Errors
    // =========================================================================

    /// Another writer holds the character. Safe to retry.
    #[error("Conflicting write on character {character_id}: {reason}")]
    Conflict { character_id: String, reason: String },

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SheetError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn conflict(character_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            character_id: character_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<sqlx::Error> for SheetError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => {
                let busy = db
                    .code()
                    .map(|code| matches!(code.as_ref(), SQLITE_BUSY | SQLITE_LOCKED | SQLITE_BUSY_SNAPSHOT))
                    .unwrap_or(false);
                if busy {
                    return Self::Conflict {
                        character_id: String::new(),
                        reason: db.message().to_string(),
                    };
                }
                Self::Database(e)
            }
            sqlx::Error::ColumnDecode { index, source } => Self::Validation {
                field: index.clone(),
                reason: source.to_string(),
            },
            _ => Self::Database(e),
        }
    }
}

/// A row skipped during aggregation because its data is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityWarning {
    /// Table the offending row lives in
    pub source: &'static str,
    /// Id of the offending row
    pub row_id: String,
    pub message: String,
}

impl IntegrityWarning {
    pub fn new(source: &'static str, row_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source,
            row_id: row_id.into(),
            message: message.into(),
        }
    }

    /// Downgrade a [`SheetError::DataIntegrity`] raised while parsing a row.
    pub fn from_error(source: &'static str, row_id: impl Into<String>, error: &SheetError) -> Self {
        Self::new(source, row_id, error.to_string())
    }
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row {}: {}", self.source, self.row_id, self.message)
    }
}
