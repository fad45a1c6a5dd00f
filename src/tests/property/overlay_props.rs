//! Property-based tests for overlay recomputation
//!
//! Each case runs against a fresh temporary database, so the case count is
//! kept low.
//!
//! Tests invariants:
//! - After any equip sequence, overlay == base + Σ(bonuses)
//! - Equip order does not change the overlay
//! - Unequipping every link deletes the overlay

use proptest::prelude::*;

use crate::core::abilities::AbilityScores;
use crate::core::attributes::AttributeRecomputationService;
use crate::database::CharacterOps;
use crate::tests::common::{create_test_character, create_test_db, create_test_equipment};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_base() -> impl Strategy<Value = AbilityScores> {
    (3i32..=18, 3i32..=18, 3i32..=18, 3i32..=18, 3i32..=18, 3i32..=18)
        .prop_map(|(s, d, c, i, w, ch)| AbilityScores::new(s, d, c, i, w, ch))
}

fn arb_bonus() -> impl Strategy<Value = AbilityScores> {
    (-4i32..=6, -4i32..=6, -4i32..=6, -4i32..=6, -4i32..=6, -4i32..=6)
        .prop_map(|(s, d, c, i, w, ch)| AbilityScores::new(s, d, c, i, w, ch))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

/// Equip `bonuses` in `order` on a fresh character and return its stored
/// overlay.
async fn equip_all(base: AbilityScores, bonuses: &[AbilityScores], order: &[usize]) -> Option<AbilityScores> {
    let (db, _temp) = create_test_db().await;
    let service = AttributeRecomputationService::new(db.clone());
    let character_id = create_test_character(&db, "Prop", base).await;

    for &index in order {
        let equipment_id = create_test_equipment(&db, &format!("Item {}", index), bonuses[index]).await;
        service
            .on_equip(&character_id, &equipment_id, None)
            .await
            .expect("Equip failed");
    }

    db.get_attribute_overlay(&character_id)
        .await
        .expect("Failed to read overlay")
        .map(|o| o.scores())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn overlay_is_base_plus_bonuses(
        base in arb_base(),
        bonuses in prop::collection::vec(arb_bonus(), 1..5),
    ) {
        let order: Vec<usize> = (0..bonuses.len()).collect();
        let overlay = runtime().block_on(equip_all(base, &bonuses, &order));

        let expected = base + bonuses.iter().copied().sum::<AbilityScores>();
        prop_assert_eq!(overlay, Some(expected));
    }

    #[test]
    fn equip_order_does_not_matter(
        base in arb_base(),
        bonuses in prop::collection::vec(arb_bonus(), 2..5),
    ) {
        let forward: Vec<usize> = (0..bonuses.len()).collect();
        let reverse: Vec<usize> = forward.iter().rev().copied().collect();

        let rt = runtime();
        let a = rt.block_on(equip_all(base, &bonuses, &forward));
        let b = rt.block_on(equip_all(base, &bonuses, &reverse));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn unequip_all_clears_overlay(
        base in arb_base(),
        bonuses in prop::collection::vec(arb_bonus(), 1..4),
    ) {
        let rt = runtime();
        let result = rt.block_on(async {
            let (db, _temp) = create_test_db().await;
            let service = AttributeRecomputationService::new(db.clone());
            let character_id = create_test_character(&db, "Prop", base).await;

            let mut link_ids = Vec::new();
            for (index, bonus) in bonuses.iter().enumerate() {
                let equipment_id = create_test_equipment(&db, &format!("Item {}", index), *bonus).await;
                link_ids.push(service.on_equip(&character_id, &equipment_id, None).await.expect("Equip failed").link.id);
            }
            let mut last = None;
            for link_id in &link_ids {
                last = service.on_unequip(link_id).await.expect("Unequip failed");
            }
            let stored = db.get_attribute_overlay(&character_id).await.expect("Failed to read overlay");
            (last, stored)
        });

        prop_assert!(result.0.is_none());
        prop_assert!(result.1.is_none());
    }
}
