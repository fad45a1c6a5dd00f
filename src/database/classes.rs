//! Class database operations
//!
//! This module provides the class catalog, the class levels held by each
//! character and read access to the progression tables.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::models::{BaseAttackRecord, BaseResistRecord, ClassDefinitionRecord, ClassLevelRecord, ClassLevelRow};
use super::{validate_name, Database};
use crate::core::error::{Result, SheetError};
use crate::core::progression::{AttackProgression, SaveProgression};

/// Extension trait for class-related database operations
pub trait ClassOps {
    // Catalog
    fn create_class(&self, class: &ClassDefinitionRecord) -> impl std::future::Future<Output = Result<()>> + Send;
    fn get_class(&self, id: &str) -> impl std::future::Future<Output = Result<Option<ClassDefinitionRecord>>> + Send;
    fn list_classes(&self) -> impl std::future::Future<Output = Result<Vec<ClassDefinitionRecord>>> + Send;

    // Class levels
    fn add_class_level(&self, class_level: &ClassLevelRecord) -> impl std::future::Future<Output = Result<()>> + Send;
    fn set_class_level(&self, class_level_id: &str, level: i32) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_class_level(&self, class_level_id: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn list_class_levels(&self, character_id: &str) -> impl std::future::Future<Output = Result<Vec<ClassLevelRecord>>> + Send;

    // Progression tables
    fn get_base_attacks(&self, levels: &[i32]) -> impl std::future::Future<Output = Result<Vec<BaseAttackRecord>>> + Send;
    fn get_base_resists(&self, levels: &[i32]) -> impl std::future::Future<Output = Result<Vec<BaseResistRecord>>> + Send;
}

impl ClassOps for Database {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    async fn create_class(&self, class: &ClassDefinitionRecord) -> Result<()> {
        validate_class(class)?;

        sqlx::query(
            "INSERT INTO classes (id, name, attack, fortitude, reflex, will) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&class.id)
        .bind(&class.name)
        .bind(&class.attack)
        .bind(&class.fortitude)
        .bind(&class.reflex)
        .bind(&class.will)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_class(&self, id: &str) -> Result<Option<ClassDefinitionRecord>> {
        let row = sqlx::query_as::<_, ClassDefinitionRecord>("SELECT * FROM classes WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    async fn list_classes(&self) -> Result<Vec<ClassDefinitionRecord>> {
        let rows = sqlx::query_as::<_, ClassDefinitionRecord>("SELECT * FROM classes ORDER BY name")
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    // =========================================================================
    // Class Level Operations
    // =========================================================================

    async fn add_class_level(&self, class_level: &ClassLevelRecord) -> Result<()> {
        validate_level(class_level.level)?;

        let mut tx = self.pool().begin().await?;

        let class_exists = sqlx::query("SELECT 1 FROM classes WHERE id = ?")
            .bind(&class_level.class_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !class_exists {
            return Err(SheetError::not_found("class", &class_level.class_id));
        }

        let character_exists = sqlx::query("SELECT 1 FROM characters WHERE id = ?")
            .bind(&class_level.character_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !character_exists {
            return Err(SheetError::not_found("character", &class_level.character_id));
        }

        sqlx::query(
            "INSERT INTO character_classes (id, character_id, class_id, level) VALUES (?, ?, ?, ?)"
        )
        .bind(&class_level.id)
        .bind(&class_level.character_id)
        .bind(&class_level.class_id)
        .bind(class_level.level)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_class_level(&self, class_level_id: &str, level: i32) -> Result<()> {
        validate_level(level)?;

        let result = sqlx::query("UPDATE character_classes SET level = ? WHERE id = ?")
            .bind(level)
            .bind(class_level_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(SheetError::not_found("class level", class_level_id));
        }
        Ok(())
    }

    async fn remove_class_level(&self, class_level_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM character_classes WHERE id = ?")
            .bind(class_level_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(SheetError::not_found("class level", class_level_id));
        }
        Ok(())
    }

    async fn list_class_levels(&self, character_id: &str) -> Result<Vec<ClassLevelRecord>> {
        let rows = sqlx::query_as::<_, ClassLevelRecord>(
            "SELECT * FROM character_classes WHERE character_id = ? ORDER BY id"
        )
        .bind(character_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // Progression Table Operations
    // =========================================================================

    async fn get_base_attacks(&self, levels: &[i32]) -> Result<Vec<BaseAttackRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_base_attacks(&mut conn, levels).await
    }

    async fn get_base_resists(&self, levels: &[i32]) -> Result<Vec<BaseResistRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_base_resists(&mut conn, levels).await
    }
}

fn validate_class(class: &ClassDefinitionRecord) -> Result<()> {
    validate_name("name", &class.name)?;
    class
        .attack
        .parse::<AttackProgression>()
        .map_err(|e| SheetError::validation("attack", e.to_string()))?;
    for (field, value) in [
        ("fortitude", &class.fortitude),
        ("reflex", &class.reflex),
        ("will", &class.will),
    ] {
        value
            .parse::<SaveProgression>()
            .map_err(|e| SheetError::validation(field, e.to_string()))?;
    }
    Ok(())
}

fn validate_level(level: i32) -> Result<()> {
    if level < 1 {
        return Err(SheetError::validation("level", format!("{} must be at least 1", level)));
    }
    Ok(())
}

// ============================================================================
// Transaction-scoped operations
// ============================================================================

/// Every class level of a character joined to its class selectors.
///
/// Selector columns are NULL for class levels whose class no longer exists.
pub async fn fetch_class_level_rows(
    conn: &mut SqliteConnection,
    character_id: &str,
) -> Result<Vec<ClassLevelRow>> {
    let rows = sqlx::query_as::<_, ClassLevelRow>(
        r#"
        SELECT cc.id AS class_level_id, cc.class_id, cc.level,
            c.attack, c.fortitude, c.reflex, c.will
        FROM character_classes cc
        LEFT JOIN classes c ON c.id = cc.class_id
        WHERE cc.character_id = ?
        ORDER BY cc.id
        "#
    )
    .bind(character_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

/// Base attack rows for exactly the given levels. Levels without a row are
/// simply absent from the result.
pub async fn fetch_base_attacks(conn: &mut SqliteConnection, levels: &[i32]) -> Result<Vec<BaseAttackRecord>> {
    if levels.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT level, low, medium, high FROM base_attacks WHERE level IN ("
    );
    let mut separated = builder.separated(", ");
    for level in levels {
        separated.push_bind(*level);
    }
    separated.push_unseparated(")");

    let rows = builder
        .build_query_as::<BaseAttackRecord>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Base save rows for exactly the given levels.
pub async fn fetch_base_resists(conn: &mut SqliteConnection, levels: &[i32]) -> Result<Vec<BaseResistRecord>> {
    if levels.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT level, low, high FROM base_resists WHERE level IN ("
    );
    let mut separated = builder.separated(", ");
    for level in levels {
        separated.push_bind(*level);
    }
    separated.push_unseparated(")");

    let rows = builder
        .build_query_as::<BaseResistRecord>()
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}
