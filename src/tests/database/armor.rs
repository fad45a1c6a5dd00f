//! Armor Database Tests
//!
//! Tests for the armor catalog and worn armor.

use crate::core::error::SheetError;
use crate::database::{ArmorDefinitionRecord, ArmorLinkRecord, ArmorOps};
use crate::tests::common::{create_test_character, create_test_db, fighter_scores, wear_test_armor};

#[tokio::test]
async fn test_armor_definitions() {
    let (db, _temp) = create_test_db().await;

    let chain = ArmorDefinitionRecord::new("Chain Shirt", 1, 4, 4);
    let buckler = ArmorDefinitionRecord::new("Buckler", 2, 1, 0);
    db.create_armor_definition(&chain).await.expect("Failed to create armor");
    db.create_armor_definition(&buckler).await.expect("Failed to create shield");

    let listed = db.list_armor_definitions().await.unwrap();
    let names: Vec<_> = listed.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Chain Shirt", "Buckler"]);

    db.delete_armor_definition(&buckler.id).await.unwrap();
    assert!(db.get_armor_definition(&buckler.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_armor_type_must_be_known() {
    let (db, _temp) = create_test_db().await;

    let mystery = ArmorDefinitionRecord::new("Mystery Plate", 9, 8, 1);
    let result = db.create_armor_definition(&mystery).await;
    assert!(matches!(result, Err(SheetError::Validation { .. })));
}

#[tokio::test]
async fn test_wear_and_remove_armor() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;

    let link_id = wear_test_armor(&db, &character_id, 1, 4, 4, 1).await;
    let worn = db.list_worn_armor(&character_id).await.unwrap();
    assert_eq!(worn.len(), 1);
    assert_eq!(worn[0].defense_value, 1);

    db.remove_armor(&link_id).await.expect("Failed to remove armor");
    assert!(db.list_worn_armor(&character_id).await.unwrap().is_empty());

    assert!(matches!(db.remove_armor(&link_id).await, Err(SheetError::NotFound { .. })));
}

#[tokio::test]
async fn test_wear_missing_armor() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;

    let link = ArmorLinkRecord::new(&character_id, "no-armor", 0, None);
    assert!(matches!(
        db.wear_armor(&link).await,
        Err(SheetError::NotFound { entity: "armor", .. })
    ));
    assert!(db.list_worn_armor(&character_id).await.unwrap().is_empty());
}
