//! Link Records
//!
//! Join rows attaching catalog entries to characters, plus the joined row
//! shapes the aggregators read. Joined catalog columns are optional because
//! a link may outlive the definition it points at.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Equipment Links
// ============================================================================

/// An equipped item. The row's existence is the "is equipped" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EquipmentLinkRecord {
    pub id: String,
    pub character_id: String,
    pub equipment_id: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl EquipmentLinkRecord {
    pub fn new(
        character_id: impl Into<String>,
        equipment_id: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            character_id: character_id.into(),
            equipment_id: equipment_id.into(),
            description,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Equipment link joined to its (possibly missing) definition
#[derive(Debug, Clone, FromRow)]
pub struct EquippedItemRow {
    pub link_id: String,
    pub equipment_id: String,
    pub name: Option<String>,
    pub strength: Option<i32>,
    pub dexterity: Option<i32>,
    pub constitution: Option<i32>,
    pub intelligence: Option<i32>,
    pub wisdom: Option<i32>,
    pub charisma: Option<i32>,
    pub attack: Option<i32>,
    pub damage: Option<i32>,
    pub armor_class: Option<i32>,
    pub fortitude: Option<i32>,
    pub reflex: Option<i32>,
    pub will: Option<i32>,
}

// ============================================================================
// Class Levels
// ============================================================================

/// A class held by a character at some level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ClassLevelRecord {
    pub id: String,
    pub character_id: String,
    pub class_id: String,
    pub level: i32,
}

impl ClassLevelRecord {
    pub fn new(character_id: impl Into<String>, class_id: impl Into<String>, level: i32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            character_id: character_id.into(),
            class_id: class_id.into(),
            level,
        }
    }
}

/// Class level joined to its (possibly missing) class definition
#[derive(Debug, Clone, FromRow)]
pub struct ClassLevelRow {
    pub class_level_id: String,
    pub class_id: String,
    pub level: i32,
    pub attack: Option<String>,
    pub fortitude: Option<String>,
    pub reflex: Option<String>,
    pub will: Option<String>,
}

// ============================================================================
// Armor Links
// ============================================================================

/// A worn armor, shield or other AC item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ArmorLinkRecord {
    pub id: String,
    pub character_id: String,
    pub armor_id: String,
    pub defense_value: i32,
    pub description: Option<String>,
}

impl ArmorLinkRecord {
    pub fn new(
        character_id: impl Into<String>,
        armor_id: impl Into<String>,
        defense_value: i32,
        description: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            character_id: character_id.into(),
            armor_id: armor_id.into(),
            defense_value,
            description,
        }
    }
}

/// Armor link joined to its (possibly missing) armor definition
#[derive(Debug, Clone, FromRow)]
pub struct WornArmorRow {
    pub link_id: String,
    pub armor_id: String,
    pub defense_value: i32,
    pub armor_type: Option<i32>,
    pub bonus: Option<i32>,
    pub dexterity: Option<i32>,
}
