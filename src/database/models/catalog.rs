//! Catalog Records
//!
//! Externally seeded reference data: equipment, classes, armor and the
//! per-level progression tables. The engine only reads these.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::abilities::AbilityScores;
use crate::core::equipment::CombatBonuses;

// ============================================================================
// Equipment Definition Record
// ============================================================================

/// Equipment catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EquipmentDefinitionRecord {
    pub id: String,
    pub name: String,
    // Ability bonuses
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    // Combat bonuses
    pub attack: i32,
    pub damage: i32,
    pub armor_class: i32,
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

impl EquipmentDefinitionRecord {
    /// A definition with every bonus at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            strength: 0,
            dexterity: 0,
            constitution: 0,
            intelligence: 0,
            wisdom: 0,
            charisma: 0,
            attack: 0,
            damage: 0,
            armor_class: 0,
            fortitude: 0,
            reflex: 0,
            will: 0,
        }
    }

    pub fn with_abilities(mut self, bonuses: AbilityScores) -> Self {
        self.strength = bonuses.strength;
        self.dexterity = bonuses.dexterity;
        self.constitution = bonuses.constitution;
        self.intelligence = bonuses.intelligence;
        self.wisdom = bonuses.wisdom;
        self.charisma = bonuses.charisma;
        self
    }

    pub fn with_combat(mut self, bonuses: CombatBonuses) -> Self {
        self.attack = bonuses.attack;
        self.damage = bonuses.damage;
        self.armor_class = bonuses.armor_class;
        self.fortitude = bonuses.fortitude;
        self.reflex = bonuses.reflex;
        self.will = bonuses.will;
        self
    }

    pub fn ability_bonuses(&self) -> AbilityScores {
        AbilityScores::new(
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        )
    }

    pub fn combat_bonuses(&self) -> CombatBonuses {
        CombatBonuses {
            attack: self.attack,
            damage: self.damage,
            armor_class: self.armor_class,
            fortitude: self.fortitude,
            reflex: self.reflex,
            will: self.will,
        }
    }
}

// ============================================================================
// Class Definition Record
// ============================================================================

/// Character class with its progression selectors.
///
/// Selectors are stored as text ("low", "medium", "high") and parsed into
/// typed progressions when aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ClassDefinitionRecord {
    pub id: String,
    pub name: String,
    pub attack: String,
    pub fortitude: String,
    pub reflex: String,
    pub will: String,
}

impl ClassDefinitionRecord {
    pub fn new(
        name: impl Into<String>,
        attack: impl Into<String>,
        fortitude: impl Into<String>,
        reflex: impl Into<String>,
        will: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            attack: attack.into(),
            fortitude: fortitude.into(),
            reflex: reflex.into(),
            will: will.into(),
        }
    }
}

// ============================================================================
// Progression Table Records
// ============================================================================

/// Base attack bonus by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BaseAttackRecord {
    pub level: i32,
    pub low: i32,
    pub medium: i32,
    pub high: i32,
}

/// Base saving throw bonus by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BaseResistRecord {
    pub level: i32,
    pub low: i32,
    pub high: i32,
}

// ============================================================================
// Armor Definition Record
// ============================================================================

/// Armor catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ArmorDefinitionRecord {
    pub id: String,
    pub name: String,
    /// 1=armor, 2=shield, 3=natural, 4=deflection, 5=misc
    pub armor_type: i32,
    pub bonus: i32,
    /// Max Dex bonus while worn; 0 or less does not constrain
    pub dexterity: i32,
}

impl ArmorDefinitionRecord {
    pub fn new(name: impl Into<String>, armor_type: i32, bonus: i32, dexterity: i32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            armor_type,
            bonus,
            dexterity,
        }
    }
}
