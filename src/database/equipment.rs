//! Equipment database operations
//!
//! This module provides the equipment catalog and the links recording which
//! items a character has equipped.

use sqlx::SqliteConnection;

use super::models::{EquipmentDefinitionRecord, EquipmentLinkRecord, EquippedItemRow};
use super::{validate_bonus, validate_description, validate_name, Database};
use crate::core::error::{Result, SheetError};

/// Extension trait for equipment-related database operations
pub trait EquipmentOps {
    // Catalog
    fn create_equipment_definition(&self, definition: &EquipmentDefinitionRecord) -> impl std::future::Future<Output = Result<()>> + Send;
    fn get_equipment_definition(&self, id: &str) -> impl std::future::Future<Output = Result<Option<EquipmentDefinitionRecord>>> + Send;
    fn list_equipment_definitions(&self) -> impl std::future::Future<Output = Result<Vec<EquipmentDefinitionRecord>>> + Send;
    fn delete_equipment_definition(&self, id: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    // Equipped items
    fn get_equipment_link(&self, link_id: &str) -> impl std::future::Future<Output = Result<Option<EquipmentLinkRecord>>> + Send;
    fn list_character_equipment(&self, character_id: &str) -> impl std::future::Future<Output = Result<Vec<EquipmentLinkRecord>>> + Send;
}

impl EquipmentOps for Database {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    async fn create_equipment_definition(&self, definition: &EquipmentDefinitionRecord) -> Result<()> {
        validate_equipment_definition(definition)?;

        sqlx::query(
            r#"
            INSERT INTO equipment_definitions
            (id, name, strength, dexterity, constitution, intelligence, wisdom, charisma,
                attack, damage, armor_class, fortitude, reflex, will)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&definition.id)
        .bind(&definition.name)
        .bind(definition.strength)
        .bind(definition.dexterity)
        .bind(definition.constitution)
        .bind(definition.intelligence)
        .bind(definition.wisdom)
        .bind(definition.charisma)
        .bind(definition.attack)
        .bind(definition.damage)
        .bind(definition.armor_class)
        .bind(definition.fortitude)
        .bind(definition.reflex)
        .bind(definition.will)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_equipment_definition(&self, id: &str) -> Result<Option<EquipmentDefinitionRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_equipment_definition(&mut conn, id).await
    }

    async fn list_equipment_definitions(&self) -> Result<Vec<EquipmentDefinitionRecord>> {
        let rows = sqlx::query_as::<_, EquipmentDefinitionRecord>(
            "SELECT * FROM equipment_definitions ORDER BY name"
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn delete_equipment_definition(&self, id: &str) -> Result<()> {
        // Links are left in place; the resolver reports them as dangling
        let result = sqlx::query("DELETE FROM equipment_definitions WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(SheetError::not_found("equipment", id));
        }
        Ok(())
    }

    // =========================================================================
    // Equipped Item Operations
    // =========================================================================

    async fn get_equipment_link(&self, link_id: &str) -> Result<Option<EquipmentLinkRecord>> {
        let mut conn = self.pool().acquire().await?;
        fetch_equipment_link(&mut conn, link_id).await
    }

    async fn list_character_equipment(&self, character_id: &str) -> Result<Vec<EquipmentLinkRecord>> {
        let rows = sqlx::query_as::<_, EquipmentLinkRecord>(
            "SELECT * FROM character_equipment WHERE character_id = ? ORDER BY created_at, id"
        )
        .bind(character_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }
}

fn validate_equipment_definition(definition: &EquipmentDefinitionRecord) -> Result<()> {
    validate_name("name", &definition.name)?;
    for (field, value) in [
        ("strength", definition.strength),
        ("dexterity", definition.dexterity),
        ("constitution", definition.constitution),
        ("intelligence", definition.intelligence),
        ("wisdom", definition.wisdom),
        ("charisma", definition.charisma),
        ("attack", definition.attack),
        ("damage", definition.damage),
        ("armor_class", definition.armor_class),
        ("fortitude", definition.fortitude),
        ("reflex", definition.reflex),
        ("will", definition.will),
    ] {
        validate_bonus(field, value)?;
    }
    Ok(())
}

// ============================================================================
// Transaction-scoped operations
// ============================================================================

pub async fn fetch_equipment_definition(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<EquipmentDefinitionRecord>> {
    let row = sqlx::query_as::<_, EquipmentDefinitionRecord>(
        "SELECT * FROM equipment_definitions WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

pub async fn fetch_equipment_link(
    conn: &mut SqliteConnection,
    link_id: &str,
) -> Result<Option<EquipmentLinkRecord>> {
    let row = sqlx::query_as::<_, EquipmentLinkRecord>(
        "SELECT * FROM character_equipment WHERE id = ?"
    )
    .bind(link_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

pub async fn insert_equipment_link(conn: &mut SqliteConnection, link: &EquipmentLinkRecord) -> Result<()> {
    validate_description(link.description.as_deref())?;

    sqlx::query(
        r#"
        INSERT INTO character_equipment (id, character_id, equipment_id, description, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#
    )
    .bind(&link.id)
    .bind(&link.character_id)
    .bind(&link.equipment_id)
    .bind(&link.description)
    .bind(&link.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Returns whether a row was removed.
pub async fn delete_equipment_link(conn: &mut SqliteConnection, link_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM character_equipment WHERE id = ?")
        .bind(link_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Every equipment link of a character joined to its definition.
///
/// Definition columns are NULL for links whose definition no longer exists.
pub async fn fetch_equipped_items(
    conn: &mut SqliteConnection,
    character_id: &str,
) -> Result<Vec<EquippedItemRow>> {
    let rows = sqlx::query_as::<_, EquippedItemRow>(
        r#"
        SELECT ce.id AS link_id, ce.equipment_id, ed.name,
            ed.strength, ed.dexterity, ed.constitution,
            ed.intelligence, ed.wisdom, ed.charisma,
            ed.attack, ed.damage, ed.armor_class,
            ed.fortitude, ed.reflex, ed.will
        FROM character_equipment ce
        LEFT JOIN equipment_definitions ed ON ed.id = ce.equipment_id
        WHERE ce.character_id = ?
        ORDER BY ce.created_at, ce.id
        "#
    )
    .bind(character_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}
