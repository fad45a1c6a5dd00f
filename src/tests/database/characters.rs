//! Character Database Tests
//!
//! Tests for character CRUD and attribute storage.

use crate::core::abilities::AbilityScores;
use crate::core::attributes::AttributeRecomputationService;
use crate::core::error::SheetError;
use crate::database::{ArmorOps, CharacterOps, CharacterRecord, ClassOps, EquipmentOps};
use crate::tests::common::{
    add_test_class_level, create_test_character, create_test_class, create_test_db, create_test_equipment,
    fighter_scores, wear_test_armor,
};

#[tokio::test]
async fn test_create_character() {
    let (db, _temp) = create_test_db().await;

    let character = CharacterRecord::new("owner-1", "Thorin Ironforge")
        .with_level(5)
        .with_hit_points(44);
    db.create_character(&character, &fighter_scores())
        .await
        .expect("Failed to create character");

    let retrieved = db
        .get_character(&character.id)
        .await
        .expect("Failed to get character")
        .expect("Character not found");

    assert_eq!(retrieved.name, "Thorin Ironforge");
    assert_eq!(retrieved.level, 5);
    assert_eq!(retrieved.hit_points_max, 44);
    assert_eq!(retrieved.hit_points_current, 44);
}

#[tokio::test]
async fn test_create_character_stores_base() {
    let (db, _temp) = create_test_db().await;
    let id = create_test_character(&db, "Mira", fighter_scores()).await;

    let base = db
        .get_attribute_base(&id)
        .await
        .expect("Failed to get base")
        .expect("Base not found");
    assert_eq!(base.scores(), fighter_scores());

    // No equipment yet, so no overlay
    let overlay = db.get_attribute_overlay(&id).await.expect("Failed to get overlay");
    assert!(overlay.is_none());
}

#[tokio::test]
async fn test_create_character_rejects_bad_input() {
    let (db, _temp) = create_test_db().await;

    let blank = CharacterRecord::new("owner-1", "   ");
    let result = db.create_character(&blank, &fighter_scores()).await;
    assert!(matches!(result, Err(SheetError::Validation { .. })));

    let zero_str = AbilityScores::new(0, 10, 10, 10, 10, 10);
    let character = CharacterRecord::new("owner-1", "Weakling");
    let result = db.create_character(&character, &zero_str).await;
    assert!(matches!(result, Err(SheetError::Validation { ref field, .. }) if field == "strength"));

    let unleveled = CharacterRecord::new("owner-1", "Nobody").with_level(0);
    let result = db.create_character(&unleveled, &fighter_scores()).await;
    assert!(matches!(result, Err(SheetError::Validation { .. })));

    // Nothing was written
    let characters = db.list_characters(None).await.expect("Failed to list");
    assert!(characters.is_empty());
}

#[tokio::test]
async fn test_list_characters_by_owner() {
    let (db, _temp) = create_test_db().await;

    for (owner, name) in [("owner-a", "Brom"), ("owner-a", "Aria"), ("owner-b", "Cass")] {
        let character = CharacterRecord::new(owner, name);
        db.create_character(&character, &AbilityScores::uniform(10))
            .await
            .expect("Failed to create character");
    }

    let owned = db
        .list_characters(Some("owner-a"))
        .await
        .expect("Failed to list characters");
    let names: Vec<_> = owned.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Aria", "Brom"]);

    let all = db.list_characters(None).await.expect("Failed to list characters");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_delete_character() {
    let (db, _temp) = create_test_db().await;
    let id = create_test_character(&db, "Doomed", fighter_scores()).await;
    let fighter = create_test_class(&db, "Fighter", "high", "high", "low", "low").await;
    add_test_class_level(&db, &id, &fighter, 2).await;
    wear_test_armor(&db, &id, 1, 4, 4, 0).await;
    let belt = create_test_equipment(&db, "Belt", AbilityScores::new(2, 0, 0, 0, 0, 0)).await;
    AttributeRecomputationService::new(db.clone())
        .on_equip(&id, &belt, None)
        .await
        .expect("Failed to equip");

    db.delete_character(&id).await.expect("Failed to delete character");

    assert!(db.get_character(&id).await.unwrap().is_none());
    assert!(db.get_attribute_base(&id).await.unwrap().is_none());
    assert!(db.get_attribute_overlay(&id).await.unwrap().is_none());
    assert!(db.list_character_equipment(&id).await.unwrap().is_empty());
    assert!(db.list_class_levels(&id).await.unwrap().is_empty());
    assert!(db.list_worn_armor(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_character() {
    let (db, _temp) = create_test_db().await;

    let result = db.delete_character("no-such-character").await;
    assert!(matches!(result, Err(SheetError::NotFound { entity: "character", .. })));
}
