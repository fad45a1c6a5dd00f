//! Equipment Database Tests
//!
//! Tests for the equipment catalog and equipment links.

use crate::core::abilities::AbilityScores;
use crate::core::equipment::CombatBonuses;
use crate::core::error::SheetError;
use crate::database::{
    insert_equipment_link, CharacterOps, EquipmentDefinitionRecord, EquipmentLinkRecord, EquipmentOps,
};
use crate::tests::common::{create_test_character, create_test_db, create_test_equipment, fighter_scores};

#[tokio::test]
async fn test_create_equipment_definition() {
    let (db, _temp) = create_test_db().await;

    let definition = EquipmentDefinitionRecord::new("Gauntlets of Ogre Power")
        .with_abilities(AbilityScores::new(2, 0, 0, 0, 0, 0))
        .with_combat(CombatBonuses {
            damage: 1,
            ..Default::default()
        });
    db.create_equipment_definition(&definition)
        .await
        .expect("Failed to create equipment");

    let retrieved = db
        .get_equipment_definition(&definition.id)
        .await
        .expect("Failed to get equipment")
        .expect("Equipment not found");
    assert_eq!(retrieved, definition);
    assert_eq!(retrieved.ability_bonuses().strength, 2);
    assert_eq!(retrieved.combat_bonuses().damage, 1);
}

#[tokio::test]
async fn test_equipment_definition_validation() {
    let (db, _temp) = create_test_db().await;

    let unnamed = EquipmentDefinitionRecord::new("");
    assert!(matches!(
        db.create_equipment_definition(&unnamed).await,
        Err(SheetError::Validation { .. })
    ));

    let absurd = EquipmentDefinitionRecord::new("Belt of Infinity")
        .with_abilities(AbilityScores::new(5000, 0, 0, 0, 0, 0));
    assert!(matches!(
        db.create_equipment_definition(&absurd).await,
        Err(SheetError::Validation { ref field, .. }) if field == "strength"
    ));

    assert!(db.list_equipment_definitions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_character_equipment() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;
    let ring = create_test_equipment(&db, "Ring", AbilityScores::new(0, 0, 0, 0, 1, 0)).await;

    let link = EquipmentLinkRecord::new(&character_id, &ring, Some("left hand".to_string()));
    let mut conn = db.pool().acquire().await.unwrap();
    insert_equipment_link(&mut conn, &link).await.expect("Failed to insert link");
    drop(conn);

    let links = db
        .list_character_equipment(&character_id)
        .await
        .expect("Failed to list equipment");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].equipment_id, ring);
    assert_eq!(links[0].description.as_deref(), Some("left hand"));

    let fetched = db.get_equipment_link(&link.id).await.unwrap();
    assert_eq!(fetched, Some(link));
}

#[tokio::test]
async fn test_link_description_too_long() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;
    let ring = create_test_equipment(&db, "Ring", AbilityScores::default()).await;

    let link = EquipmentLinkRecord::new(&character_id, &ring, Some("x".repeat(256)));
    let mut conn = db.pool().acquire().await.unwrap();
    let result = insert_equipment_link(&mut conn, &link).await;
    assert!(matches!(result, Err(SheetError::Validation { .. })));
}

#[tokio::test]
async fn test_delete_missing_equipment_definition() {
    let (db, _temp) = create_test_db().await;
    let result = db.delete_equipment_definition("missing").await;
    assert!(matches!(result, Err(SheetError::NotFound { .. })));
}

#[tokio::test]
async fn test_deleting_character_removes_links() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;
    let ring = create_test_equipment(&db, "Ring", AbilityScores::default()).await;

    let link = EquipmentLinkRecord::new(&character_id, &ring, None);
    let mut conn = db.pool().acquire().await.unwrap();
    insert_equipment_link(&mut conn, &link).await.unwrap();
    drop(conn);

    db.delete_character(&character_id).await.unwrap();
    assert!(db.get_equipment_link(&link.id).await.unwrap().is_none());
    // The catalog entry is untouched
    assert!(db.get_equipment_definition(&ring).await.unwrap().is_some());
}
