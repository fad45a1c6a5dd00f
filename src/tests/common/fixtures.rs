//! Test Fixtures
//!
//! Temporary databases and seeded characters, equipment, classes and armor.

use tempfile::TempDir;

use crate::core::abilities::AbilityScores;
use crate::database::{
    ArmorDefinitionRecord, ArmorLinkRecord, ArmorOps, CharacterOps, CharacterRecord, ClassDefinitionRecord,
    ClassLevelRecord, ClassOps, Database, EquipmentDefinitionRecord, EquipmentOps,
};

// =============================================================================
// Database Fixtures
// =============================================================================

/// Create a test database in a temporary directory.
/// Returns both the database and the TempDir (which must be kept alive).
pub async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db = Database::new(temp_dir.path())
        .await
        .expect("Failed to create test database");
    (db, temp_dir)
}

// =============================================================================
// Character Fixtures
// =============================================================================

/// Scores used by most tests: STR 16, DEX 14, CON 12, INT 10, WIS 10, CHA 8.
pub fn fighter_scores() -> AbilityScores {
    AbilityScores::new(16, 14, 12, 10, 10, 8)
}

/// Insert a character with the given base scores and return its id.
pub async fn create_test_character(db: &Database, name: &str, scores: AbilityScores) -> String {
    let character = CharacterRecord::new("owner-1", name).with_hit_points(12);
    db.create_character(&character, &scores)
        .await
        .expect("Failed to create character");
    character.id
}

// =============================================================================
// Catalog Fixtures
// =============================================================================

/// Insert an equipment definition with only ability bonuses and return its id.
pub async fn create_test_equipment(db: &Database, name: &str, bonuses: AbilityScores) -> String {
    let definition = EquipmentDefinitionRecord::new(name).with_abilities(bonuses);
    db.create_equipment_definition(&definition)
        .await
        .expect("Failed to create equipment");
    definition.id
}

/// Insert a class and return its id.
pub async fn create_test_class(db: &Database, name: &str, attack: &str, fortitude: &str, reflex: &str, will: &str) -> String {
    let class = ClassDefinitionRecord::new(name, attack, fortitude, reflex, will);
    db.create_class(&class).await.expect("Failed to create class");
    class.id
}

/// Give a character `level` levels in `class_id` and return the class level id.
pub async fn add_test_class_level(db: &Database, character_id: &str, class_id: &str, level: i32) -> String {
    let class_level = ClassLevelRecord::new(character_id, class_id, level);
    db.add_class_level(&class_level)
        .await
        .expect("Failed to add class level");
    class_level.id
}

/// Insert an armor definition and put it on the character. Returns the link id.
pub async fn wear_test_armor(
    db: &Database,
    character_id: &str,
    armor_type: i32,
    bonus: i32,
    dexterity: i32,
    defense_value: i32,
) -> String {
    let armor = ArmorDefinitionRecord::new(format!("armor-{}-{}", armor_type, bonus), armor_type, bonus, dexterity);
    db.create_armor_definition(&armor)
        .await
        .expect("Failed to create armor");
    let link = ArmorLinkRecord::new(character_id, &armor.id, defense_value, None);
    db.wear_armor(&link).await.expect("Failed to wear armor");
    link.id
}
