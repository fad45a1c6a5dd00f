//! Property-based tests for ability modifiers and score arithmetic
//!
//! Tests invariants:
//! - Modifier is floor((score - 10) / 2)
//! - Modifier never decreases as the score rises
//! - Score addition is commutative and `Sum` agrees with folding `Add`

use proptest::prelude::*;

use crate::core::abilities::{modifier, Ability, AbilityScores};
use crate::core::armor_class::DexCap;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_scores() -> impl Strategy<Value = AbilityScores> {
    (
        -50i32..50,
        -50i32..50,
        -50i32..50,
        -50i32..50,
        -50i32..50,
        -50i32..50,
    )
        .prop_map(|(s, d, c, i, w, ch)| AbilityScores::new(s, d, c, i, w, ch))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn modifier_is_floor_of_half(score in -1000i32..1000) {
        let m = modifier(score);
        // floor division: 2m <= score - 10 < 2m + 2
        prop_assert!(2 * m <= score - 10);
        prop_assert!(score - 10 < 2 * m + 2);
    }

    #[test]
    fn modifier_is_monotonic(score in -1000i32..1000) {
        prop_assert!(modifier(score) <= modifier(score + 1));
    }

    #[test]
    fn score_addition_commutes(a in arb_scores(), b in arb_scores()) {
        prop_assert_eq!(a + b, b + a);
    }

    #[test]
    fn sum_matches_fold(items in prop::collection::vec(arb_scores(), 0..10)) {
        let summed: AbilityScores = items.iter().copied().sum();
        let folded = items.iter().fold(AbilityScores::default(), |acc, s| acc + *s);
        prop_assert_eq!(summed, folded);
    }

    #[test]
    fn modifiers_match_per_ability(scores in arb_scores()) {
        let modifiers = scores.modifiers();
        for ability in Ability::ALL {
            prop_assert_eq!(modifiers.get(ability), modifier(scores.get(ability)));
        }
    }

    #[test]
    fn dex_cap_never_raises(dex in -10i32..20, cap in 0i32..10) {
        let applied = DexCap::Capped(cap).apply(dex);
        prop_assert!(applied <= dex);
        prop_assert_eq!(applied, dex.min(cap));
        prop_assert_eq!(DexCap::Unbounded.apply(dex), dex);
    }
}
