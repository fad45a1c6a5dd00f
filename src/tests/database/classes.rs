//! Class Database Tests
//!
//! Tests for the class catalog, class levels and seeded progression tables.

use crate::core::error::SheetError;
use crate::database::{ClassDefinitionRecord, ClassLevelRecord, ClassOps};
use crate::tests::common::{add_test_class_level, create_test_character, create_test_class, create_test_db, fighter_scores};

#[tokio::test]
async fn test_seeded_progression_tables() {
    let (db, _temp) = create_test_db().await;

    let levels: Vec<i32> = (1..=20).collect();
    let attacks = db.get_base_attacks(&levels).await.expect("Failed to read base attacks");
    let resists = db.get_base_resists(&levels).await.expect("Failed to read base resists");
    assert_eq!(attacks.len(), 20);
    assert_eq!(resists.len(), 20);

    for row in &attacks {
        let l = row.level;
        assert_eq!(row.low, l / 2, "attack low at level {}", l);
        assert_eq!(row.medium, 3 * l / 4, "attack medium at level {}", l);
        assert_eq!(row.high, l, "attack high at level {}", l);
    }
    for row in &resists {
        let l = row.level;
        assert_eq!(row.low, l / 3, "save low at level {}", l);
        assert_eq!(row.high, 2 + l / 2, "save high at level {}", l);
    }
}

#[tokio::test]
async fn test_progression_lookup_subset() {
    let (db, _temp) = create_test_db().await;

    let attacks = db.get_base_attacks(&[3, 5, 99]).await.unwrap();
    let levels: Vec<i32> = attacks.iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![3, 5]);

    assert!(db.get_base_resists(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_class_validates_selectors() {
    let (db, _temp) = create_test_db().await;

    let fighter = ClassDefinitionRecord::new("Fighter", "High", " high", "low", "LOW");
    db.create_class(&fighter).await.expect("Failed to create class");
    assert_eq!(db.get_class(&fighter.id).await.unwrap(), Some(fighter));

    let broken = ClassDefinitionRecord::new("Broken", "medium", "medium", "low", "low");
    let result = db.create_class(&broken).await;
    assert!(matches!(result, Err(SheetError::Validation { ref field, .. }) if field == "fortitude"));

    assert_eq!(db.list_classes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_class_levels() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;
    let fighter = create_test_class(&db, "Fighter", "high", "high", "low", "low").await;
    let wizard = create_test_class(&db, "Wizard", "low", "low", "low", "high").await;

    let fighter_level = add_test_class_level(&db, &character_id, &fighter, 2).await;
    add_test_class_level(&db, &character_id, &wizard, 1).await;
    assert_eq!(db.list_class_levels(&character_id).await.unwrap().len(), 2);

    db.set_class_level(&fighter_level, 3).await.expect("Failed to level up");
    let levels = db.list_class_levels(&character_id).await.unwrap();
    let updated = levels.iter().find(|l| l.id == fighter_level).unwrap();
    assert_eq!(updated.level, 3);

    db.remove_class_level(&fighter_level).await.expect("Failed to remove class");
    assert_eq!(db.list_class_levels(&character_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_class_level_errors() {
    let (db, _temp) = create_test_db().await;
    let character_id = create_test_character(&db, "Mira", fighter_scores()).await;
    let fighter = create_test_class(&db, "Fighter", "high", "high", "low", "low").await;

    let missing_class = ClassLevelRecord::new(&character_id, "no-class", 1);
    assert!(matches!(
        db.add_class_level(&missing_class).await,
        Err(SheetError::NotFound { entity: "class", .. })
    ));

    let missing_character = ClassLevelRecord::new("no-character", &fighter, 1);
    assert!(matches!(
        db.add_class_level(&missing_character).await,
        Err(SheetError::NotFound { entity: "character", .. })
    ));

    let zero = ClassLevelRecord::new(&character_id, &fighter, 0);
    assert!(matches!(db.add_class_level(&zero).await, Err(SheetError::Validation { .. })));

    assert!(matches!(
        db.set_class_level("no-such-level", 2).await,
        Err(SheetError::NotFound { .. })
    ));
}
