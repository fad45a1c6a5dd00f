//! Character Records
//!
//! Characters, their permanent ability scores and the derived overlay.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::abilities::AbilityScores;

// ============================================================================
// Character Record
// ============================================================================

/// Character database record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CharacterRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub level: i32,
    pub hit_points_max: i32,
    pub hit_points_current: i32,
    // Opaque references into externally managed tables
    pub size_id: Option<String>,
    pub gender_id: Option<String>,
    pub race_id: Option<String>,
    pub alignment_id: Option<String>,
    pub divinity_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CharacterRecord {
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            level: 1,
            hit_points_max: 0,
            hit_points_current: 0,
            size_id: None,
            gender_id: None,
            race_id: None,
            alignment_id: None,
            divinity_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn with_hit_points(mut self, max: i32) -> Self {
        self.hit_points_max = max;
        self.hit_points_current = max;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }
}

// ============================================================================
// Attribute Records
// ============================================================================

/// Permanent ability scores, one row per character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AttributeBaseRecord {
    pub character_id: String,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AttributeBaseRecord {
    pub fn scores(&self) -> AbilityScores {
        AbilityScores::new(
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        )
    }
}

/// Temporary attributes: base plus every equipped item's bonuses.
///
/// Derived cache. Absent when the character has nothing equipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AttributeOverlayRecord {
    pub character_id: String,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub updated_at: String,
}

impl AttributeOverlayRecord {
    pub fn from_scores(character_id: impl Into<String>, scores: AbilityScores) -> Self {
        Self {
            character_id: character_id.into(),
            strength: scores.strength,
            dexterity: scores.dexterity,
            constitution: scores.constitution,
            intelligence: scores.intelligence,
            wisdom: scores.wisdom,
            charisma: scores.charisma,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn scores(&self) -> AbilityScores {
        AbilityScores::new(
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        )
    }
}
