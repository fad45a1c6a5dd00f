//! Database Migrations
//!
//! Handles schema creation and versioned migrations. Progression tables are
//! reference data and ship as their own migration so a revised table is a
//! new schema version rather than an in-place edit.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::{info, warn};

/// Current database schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create migrations table if it doesn't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#
    )
    .execute(pool)
    .await?;

    let current_version = get_current_version(pool).await?;

    info!(current_version, target_version = SCHEMA_VERSION, "Checking database migrations");

    if current_version < SCHEMA_VERSION {
        info!("Running database migrations from v{} to v{}", current_version, SCHEMA_VERSION);

        for version in (current_version + 1)..=SCHEMA_VERSION {
            run_migration(pool, version).await?;
        }

        info!("Database migrations completed successfully");
    }

    Ok(())
}

/// Get the current schema version
pub async fn get_current_version(pool: &SqlitePool) -> Result<i32, sqlx::Error> {
    let result = sqlx::query("SELECT MAX(version) as version FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(result
        .and_then(|row| row.try_get::<i32, _>("version").ok())
        .unwrap_or(0))
}

/// Run a specific migration version
async fn run_migration(pool: &SqlitePool, version: i32) -> Result<(), sqlx::Error> {
    let (name, sql) = match version {
        1 => ("initial_schema", MIGRATION_V1),
        2 => ("progression_tables_d20", MIGRATION_V2),
        _ => {
            warn!("Unknown migration version: {}", version);
            return Ok(());
        }
    };

    info!("Applying migration v{}: {}", version, name);

    // A half-applied migration would be recorded as missing and re-run
    let mut tx = pool.begin().await?;

    for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement.trim())
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(version)
        .bind(name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Migration v1: Initial schema
///
/// Catalog references from link tables carry no foreign key: the catalog is
/// managed outside this store and dangling links are reported by the
/// aggregators instead.
const MIGRATION_V1: &str = r#"
-- Characters table
CREATE TABLE IF NOT EXISTS characters (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
    hit_points_max INTEGER NOT NULL DEFAULT 0,
    hit_points_current INTEGER NOT NULL DEFAULT 0,
    size_id TEXT,
    gender_id TEXT,
    race_id TEXT,
    alignment_id TEXT,
    divinity_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_characters_owner ON characters(owner_id);

-- Permanent ability scores
CREATE TABLE IF NOT EXISTS attribute_bases (
    character_id TEXT PRIMARY KEY REFERENCES characters(id) ON DELETE CASCADE,
    strength INTEGER NOT NULL,
    dexterity INTEGER NOT NULL,
    constitution INTEGER NOT NULL,
    intelligence INTEGER NOT NULL,
    wisdom INTEGER NOT NULL,
    charisma INTEGER NOT NULL
);

-- Temporary attributes (base plus equipped bonuses)
CREATE TABLE IF NOT EXISTS attribute_overlays (
    character_id TEXT PRIMARY KEY REFERENCES characters(id) ON DELETE CASCADE,
    strength INTEGER NOT NULL,
    dexterity INTEGER NOT NULL,
    constitution INTEGER NOT NULL,
    intelligence INTEGER NOT NULL,
    wisdom INTEGER NOT NULL,
    charisma INTEGER NOT NULL,
    updated_at TEXT NOT NULL
);

-- Equipment catalog
CREATE TABLE IF NOT EXISTS equipment_definitions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    strength INTEGER NOT NULL DEFAULT 0,
    dexterity INTEGER NOT NULL DEFAULT 0,
    constitution INTEGER NOT NULL DEFAULT 0,
    intelligence INTEGER NOT NULL DEFAULT 0,
    wisdom INTEGER NOT NULL DEFAULT 0,
    charisma INTEGER NOT NULL DEFAULT 0,
    attack INTEGER NOT NULL DEFAULT 0,
    damage INTEGER NOT NULL DEFAULT 0,
    armor_class INTEGER NOT NULL DEFAULT 0,
    fortitude INTEGER NOT NULL DEFAULT 0,
    reflex INTEGER NOT NULL DEFAULT 0,
    will INTEGER NOT NULL DEFAULT 0
);

-- Equipped items
CREATE TABLE IF NOT EXISTS character_equipment (
    id TEXT PRIMARY KEY,
    character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    equipment_id TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_character_equipment_character ON character_equipment(character_id);

-- Class catalog
CREATE TABLE IF NOT EXISTS classes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    attack TEXT NOT NULL,
    fortitude TEXT NOT NULL,
    reflex TEXT NOT NULL,
    will TEXT NOT NULL
);

-- Class levels held by characters
CREATE TABLE IF NOT EXISTS character_classes (
    id TEXT PRIMARY KEY,
    character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    class_id TEXT NOT NULL,
    level INTEGER NOT NULL CHECK (level >= 1)
);

CREATE INDEX IF NOT EXISTS idx_character_classes_character ON character_classes(character_id);

-- Progression tables
CREATE TABLE IF NOT EXISTS base_attacks (
    level INTEGER PRIMARY KEY,
    low INTEGER NOT NULL,
    medium INTEGER NOT NULL,
    high INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS base_resists (
    level INTEGER PRIMARY KEY,
    low INTEGER NOT NULL,
    high INTEGER NOT NULL
);

-- Armor catalog
CREATE TABLE IF NOT EXISTS armor_definitions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    armor_type INTEGER NOT NULL,
    bonus INTEGER NOT NULL DEFAULT 0,
    dexterity INTEGER NOT NULL DEFAULT 0
);

-- Worn armor
CREATE TABLE IF NOT EXISTS character_armors (
    id TEXT PRIMARY KEY,
    character_id TEXT NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
    armor_id TEXT NOT NULL,
    defense_value INTEGER NOT NULL DEFAULT 0,
    description TEXT
);

CREATE INDEX IF NOT EXISTS idx_character_armors_character ON character_armors(character_id)
"#;

/// Migration v2: d20 progression tables, levels 1-20
///
/// Attack: low = L/2, medium = 3L/4, high = L.
/// Saves: low = L/3, high = 2 + L/2. All divisions round down.
const MIGRATION_V2: &str = r#"
INSERT OR REPLACE INTO base_attacks (level, low, medium, high) VALUES
    (1, 0, 0, 1),
    (2, 1, 1, 2),
    (3, 1, 2, 3),
    (4, 2, 3, 4),
    (5, 2, 3, 5),
    (6, 3, 4, 6),
    (7, 3, 5, 7),
    (8, 4, 6, 8),
    (9, 4, 6, 9),
    (10, 5, 7, 10),
    (11, 5, 8, 11),
    (12, 6, 9, 12),
    (13, 6, 9, 13),
    (14, 7, 10, 14),
    (15, 7, 11, 15),
    (16, 8, 12, 16),
    (17, 8, 12, 17),
    (18, 9, 13, 18),
    (19, 9, 14, 19),
    (20, 10, 15, 20);

INSERT OR REPLACE INTO base_resists (level, low, high) VALUES
    (1, 0, 2),
    (2, 0, 3),
    (3, 1, 3),
    (4, 1, 4),
    (5, 1, 4),
    (6, 2, 5),
    (7, 2, 5),
    (8, 2, 6),
    (9, 3, 6),
    (10, 3, 7),
    (11, 3, 7),
    (12, 4, 8),
    (13, 4, 8),
    (14, 4, 9),
    (15, 5, 9),
    (16, 5, 10),
    (17, 5, 10),
    (18, 6, 11),
    (19, 6, 11),
    (20, 6, 12)
"#;
