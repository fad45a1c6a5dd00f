//! Character database operations
//!
//! This module provides CRUD operations for characters and access to their
//! base attributes and temporary overlay.

use sqlx::SqliteConnection;

use super::models::{AttributeBaseRecord, AttributeOverlayRecord, CharacterRecord};
use super::{validate_name, Database};
use crate::core::abilities::{Ability, AbilityScores};
use crate::core::error::{Result, SheetError};

/// Extension trait for character-related database operations
pub trait CharacterOps {
    fn create_character(&self, character: &CharacterRecord, base: &AbilityScores) -> impl std::future::Future<Output = Result<()>> + Send;
    fn get_character(&self, id: &str) -> impl std::future::Future<Output = Result<Option<CharacterRecord>>> + Send;
    fn list_characters(&self, owner_id: Option<&str>) -> impl std::future::Future<Output = Result<Vec<CharacterRecord>>> + Send;
    fn delete_character(&self, id: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    // Attributes
    fn get_attribute_base(&self, character_id: &str) -> impl std::future::Future<Output = Result<Option<AttributeBaseRecord>>> + Send;
    fn get_attribute_overlay(&self, character_id: &str) -> impl std::future::Future<Output = Result<Option<AttributeOverlayRecord>>> + Send;
}

impl CharacterOps for Database {
    async fn create_character(&self, character: &CharacterRecord, base: &AbilityScores) -> Result<()> {
        validate_name("name", &character.name)?;
        validate_scores(base)?;
        if character.level < 1 {
            return Err(SheetError::validation("level", "must be at least 1"));
        }

        // Character and base attributes exist together or not at all
        let mut tx = self.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO characters
            (id, owner_id, name, level, hit_points_max, hit_points_current,
                size_id, gender_id, race_id, alignment_id, divinity_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&character.id)
        .bind(&character.owner_id)
        .bind(&character.name)
        .bind(character.level)
        .bind(character.hit_points_max)
        .bind(character.hit_points_current)
        .bind(&character.size_id)
        .bind(&character.gender_id)
        .bind(&character.race_id)
        .bind(&character.alignment_id)
        .bind(&character.divinity_id)
        .bind(&character.created_at)
        .bind(&character.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO attribute_bases
            (character_id, strength, dexterity, constitution, intelligence, wisdom, charisma)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&character.id)
        .bind(base.strength)
        .bind(base.dexterity)
        .bind(base.constitution)
        .bind(base.intelligence)
        .bind(base.wisdom)
        .bind(base.charisma)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(character_id = %character.id, owner_id = %character.owner_id, "Character created");
        Ok(())
    }

    async fn get_character(&self, id: &str) -> Result<Option<CharacterRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_character(&mut conn, id).await
    }

    async fn list_characters(&self, owner_id: Option<&str>) -> Result<Vec<CharacterRecord>> {
        let rows = if let Some(owner) = owner_id {
            sqlx::query_as::<_, CharacterRecord>(
                "SELECT * FROM characters WHERE owner_id = ? ORDER BY name"
            )
            .bind(owner)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, CharacterRecord>(
                "SELECT * FROM characters ORDER BY name"
            )
            .fetch_all(self.pool())
            .await?
        };
        Ok(rows)
    }

    async fn delete_character(&self, id: &str) -> Result<()> {
        // Attributes and links go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(SheetError::not_found("character", id));
        }

        tracing::info!(character_id = %id, "Character deleted");
        Ok(())
    }

    async fn get_attribute_base(&self, character_id: &str) -> Result<Option<AttributeBaseRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_attribute_base(&mut conn, character_id).await
    }

    async fn get_attribute_overlay(&self, character_id: &str) -> Result<Option<AttributeOverlayRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_attribute_overlay(&mut conn, character_id).await
    }
}

// ============================================================================
// Transaction-scoped operations
// ============================================================================

/// Take the store's write lock on behalf of `character_id`.
///
/// Must be the first statement of a write transaction: the UPDATE upgrades
/// the transaction to a writer before anything is read, so no other writer
/// can change the character's rows until commit or rollback.
pub async fn lock_character(conn: &mut SqliteConnection, character_id: &str) -> Result<()> {
    let result = sqlx::query("UPDATE characters SET updated_at = ? WHERE id = ?")
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(character_id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SheetError::not_found("character", character_id));
    }
    Ok(())
}

pub async fn fetch_character(conn: &mut SqliteConnection, id: &str) -> Result<Option<CharacterRecord>> {
    let row = sqlx::query_as::<_, CharacterRecord>("SELECT * FROM characters WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn fetch_attribute_base(
    conn: &mut SqliteConnection,
    character_id: &str,
) -> Result<Option<AttributeBaseRecord>> {
    let row = sqlx::query_as::<_, AttributeBaseRecord>(
        "SELECT * FROM attribute_bases WHERE character_id = ?"
    )
    .bind(character_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

/// Base attributes of a character that must exist.
pub async fn require_attribute_base(
    conn: &mut SqliteConnection,
    character_id: &str,
) -> Result<AttributeBaseRecord> {
    fetch_attribute_base(conn, character_id)
        .await?
        .ok_or_else(|| SheetError::not_found("attribute base", character_id))
}

pub async fn write_attribute_base(
    conn: &mut SqliteConnection,
    character_id: &str,
    scores: &AbilityScores,
) -> Result<()> {
    validate_scores(scores)?;
    let result = sqlx::query(
        r#"
        UPDATE attribute_bases
        SET strength = ?, dexterity = ?, constitution = ?,
            intelligence = ?, wisdom = ?, charisma = ?
        WHERE character_id = ?
        "#
    )
    .bind(scores.strength)
    .bind(scores.dexterity)
    .bind(scores.constitution)
    .bind(scores.intelligence)
    .bind(scores.wisdom)
    .bind(scores.charisma)
    .bind(character_id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return Err(SheetError::not_found("attribute base", character_id));
    }
    Ok(())
}

pub async fn fetch_attribute_overlay(
    conn: &mut SqliteConnection,
    character_id: &str,
) -> Result<Option<AttributeOverlayRecord>> {
    let row = sqlx::query_as::<_, AttributeOverlayRecord>(
        "SELECT * FROM attribute_overlays WHERE character_id = ?"
    )
    .bind(character_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

/// Create or replace the overlay with exactly these values.
pub async fn upsert_attribute_overlay(
    conn: &mut SqliteConnection,
    overlay: &AttributeOverlayRecord,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO attribute_overlays
        (character_id, strength, dexterity, constitution, intelligence, wisdom, charisma, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(character_id) DO UPDATE SET
            strength = excluded.strength,
            dexterity = excluded.dexterity,
            constitution = excluded.constitution,
            intelligence = excluded.intelligence,
            wisdom = excluded.wisdom,
            charisma = excluded.charisma,
            updated_at = excluded.updated_at
        "#
    )
    .bind(&overlay.character_id)
    .bind(overlay.strength)
    .bind(overlay.dexterity)
    .bind(overlay.constitution)
    .bind(overlay.intelligence)
    .bind(overlay.wisdom)
    .bind(overlay.charisma)
    .bind(&overlay.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Returns whether a row was removed.
pub async fn delete_attribute_overlay(conn: &mut SqliteConnection, character_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM attribute_overlays WHERE character_id = ?")
        .bind(character_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Ability scores are integers in `1..=MAX_SCORE`.
pub fn validate_scores(scores: &AbilityScores) -> Result<()> {
    for ability in Ability::ALL {
        let value = scores.get(ability);
        if !(1..=MAX_SCORE).contains(&value) {
            return Err(SheetError::validation(
                ability.as_str(),
                format!("score {} is outside 1..={}", value, MAX_SCORE),
            ));
        }
    }
    Ok(())
}

/// Highest base score accepted for any ability
pub const MAX_SCORE: i32 = 1000;
