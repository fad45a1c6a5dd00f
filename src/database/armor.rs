//! Armor database operations
//!
//! This module provides the armor catalog and the links recording what a
//! character is wearing.

use sqlx::SqliteConnection;

use super::models::{ArmorDefinitionRecord, ArmorLinkRecord, WornArmorRow};
use super::{validate_bonus, validate_description, validate_name, Database};
use crate::core::armor_class::ArmorType;
use crate::core::error::{Result, SheetError};

/// Extension trait for armor-related database operations
pub trait ArmorOps {
    // Catalog
    fn create_armor_definition(&self, armor: &ArmorDefinitionRecord) -> impl std::future::Future<Output = Result<()>> + Send;
    fn get_armor_definition(&self, id: &str) -> impl std::future::Future<Output = Result<Option<ArmorDefinitionRecord>>> + Send;
    fn list_armor_definitions(&self) -> impl std::future::Future<Output = Result<Vec<ArmorDefinitionRecord>>> + Send;
    fn delete_armor_definition(&self, id: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    // Worn armor
    fn wear_armor(&self, link: &ArmorLinkRecord) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_armor(&self, link_id: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn list_worn_armor(&self, character_id: &str) -> impl std::future::Future<Output = Result<Vec<ArmorLinkRecord>>> + Send;
}

impl ArmorOps for Database {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    async fn create_armor_definition(&self, armor: &ArmorDefinitionRecord) -> Result<()> {
        validate_name("name", &armor.name)?;
        ArmorType::try_from(armor.armor_type)
            .map_err(|e| SheetError::validation("armor_type", e.to_string()))?;
        validate_bonus("bonus", armor.bonus)?;
        validate_bonus("dexterity", armor.dexterity)?;

        sqlx::query(
            "INSERT INTO armor_definitions (id, name, armor_type, bonus, dexterity) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&armor.id)
        .bind(&armor.name)
        .bind(armor.armor_type)
        .bind(armor.bonus)
        .bind(armor.dexterity)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_armor_definition(&self, id: &str) -> Result<Option<ArmorDefinitionRecord>> {
        let row = sqlx::query_as::<_, ArmorDefinitionRecord>("SELECT * FROM armor_definitions WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row)
    }

    async fn list_armor_definitions(&self) -> Result<Vec<ArmorDefinitionRecord>> {
        let rows = sqlx::query_as::<_, ArmorDefinitionRecord>(
            "SELECT * FROM armor_definitions ORDER BY armor_type, name"
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn delete_armor_definition(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM armor_definitions WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(SheetError::not_found("armor", id));
        }
        Ok(())
    }

    // =========================================================================
    // Worn Armor Operations
    // =========================================================================

    async fn wear_armor(&self, link: &ArmorLinkRecord) -> Result<()> {
        validate_description(link.description.as_deref())?;
        validate_bonus("defense_value", link.defense_value)?;

        let mut tx = self.pool().begin().await?;

        let armor_exists = sqlx::query("SELECT 1 FROM armor_definitions WHERE id = ?")
            .bind(&link.armor_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !armor_exists {
            return Err(SheetError::not_found("armor", &link.armor_id));
        }

        let character_exists = sqlx::query("SELECT 1 FROM characters WHERE id = ?")
            .bind(&link.character_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !character_exists {
            return Err(SheetError::not_found("character", &link.character_id));
        }

        sqlx::query(
            r#"
            INSERT INTO character_armors (id, character_id, armor_id, defense_value, description)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&link.id)
        .bind(&link.character_id)
        .bind(&link.armor_id)
        .bind(link.defense_value)
        .bind(&link.description)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove_armor(&self, link_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM character_armors WHERE id = ?")
            .bind(link_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(SheetError::not_found("armor link", link_id));
        }
        Ok(())
    }

    async fn list_worn_armor(&self, character_id: &str) -> Result<Vec<ArmorLinkRecord>> {
        let rows = sqlx::query_as::<_, ArmorLinkRecord>(
            "SELECT * FROM character_armors WHERE character_id = ? ORDER BY id"
        )
        .bind(character_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}

// ============================================================================
// Transaction-scoped operations
// ============================================================================

/// Every armor link of a character joined to its definition.
///
/// Definition columns are NULL for links whose definition no longer exists.
pub async fn fetch_worn_armor(conn: &mut SqliteConnection, character_id: &str) -> Result<Vec<WornArmorRow>> {
    let rows = sqlx::query_as::<_, WornArmorRow>(
        r#"
        SELECT ca.id AS link_id, ca.armor_id, ca.defense_value,
            ad.armor_type, ad.bonus, ad.dexterity
        FROM character_armors ca
        LEFT JOIN armor_definitions ad ON ad.id = ca.armor_id
        WHERE ca.character_id = ?
        ORDER BY ca.id
        "#
    )
    .bind(character_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}
