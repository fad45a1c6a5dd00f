//! Ability scores and modifiers.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// The six ability scores, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Column name used by every table that stores the six scores.
    pub fn as_str(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }
}

/// Modifier for an ability score: `floor((score - 10) / 2)`.
///
/// Floor division reproduces the low end of the table (9 -> -1, 1 -> -5)
/// without special-casing scores below 10.
pub fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Six signed values, one per ability.
///
/// Used both for absolute scores (base, overlay) and for summed bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Every score set to the same value.
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        modifier(self.get(ability))
    }

    /// Modifiers of all six scores.
    pub fn modifiers(&self) -> AbilityScores {
        AbilityScores::new(
            modifier(self.strength),
            modifier(self.dexterity),
            modifier(self.constitution),
            modifier(self.intelligence),
            modifier(self.wisdom),
            modifier(self.charisma),
        )
    }

    pub fn is_zero(&self) -> bool {
        *self == AbilityScores::default()
    }

    /// Field-wise addition, `None` if any field overflows.
    pub fn checked_add(&self, rhs: &AbilityScores) -> Option<AbilityScores> {
        Some(AbilityScores::new(
            self.strength.checked_add(rhs.strength)?,
            self.dexterity.checked_add(rhs.dexterity)?,
            self.constitution.checked_add(rhs.constitution)?,
            self.intelligence.checked_add(rhs.intelligence)?,
            self.wisdom.checked_add(rhs.wisdom)?,
            self.charisma.checked_add(rhs.charisma)?,
        ))
    }
}

impl Add for AbilityScores {
    type Output = AbilityScores;

    fn add(self, rhs: AbilityScores) -> AbilityScores {
        AbilityScores::new(
            self.strength + rhs.strength,
            self.dexterity + rhs.dexterity,
            self.constitution + rhs.constitution,
            self.intelligence + rhs.intelligence,
            self.wisdom + rhs.wisdom,
            self.charisma + rhs.charisma,
        )
    }
}

impl std::iter::Sum for AbilityScores {
    fn sum<I: Iterator<Item = AbilityScores>>(iter: I) -> Self {
        iter.fold(AbilityScores::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 0)]
    #[case(11, 0)]
    #[case(12, 1)]
    #[case(9, -1)]
    #[case(8, -1)]
    #[case(7, -2)]
    #[case(6, -2)]
    #[case(5, -3)]
    #[case(4, -3)]
    #[case(3, -4)]
    #[case(2, -4)]
    #[case(1, -5)]
    #[case(0, -5)]
    #[case(20, 5)]
    #[case(40, 15)]
    fn test_modifier_table(#[case] score: i32, #[case] expected: i32) {
        assert_eq!(modifier(score), expected);
    }

    #[test]
    fn test_scores_add_fieldwise() {
        let base = AbilityScores::new(10, 12, 14, 8, 13, 15);
        let bonus = AbilityScores::new(2, 0, -1, 0, 4, 0);
        assert_eq!(base + bonus, AbilityScores::new(12, 12, 13, 8, 17, 15));
    }

    #[test]
    fn test_checked_add_detects_overflow() {
        let base = AbilityScores::new(i32::MAX, 10, 10, 10, 10, 10);
        assert_eq!(base.checked_add(&AbilityScores::new(1, 0, 0, 0, 0, 0)), None);
        assert_eq!(
            base.checked_add(&AbilityScores::new(0, 2, 0, 0, 0, 0)),
            Some(AbilityScores::new(i32::MAX, 12, 10, 10, 10, 10))
        );
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: AbilityScores = Vec::<AbilityScores>::new().into_iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_get_matches_fields() {
        let scores = AbilityScores::new(1, 2, 3, 4, 5, 6);
        let values: Vec<i32> = Ability::ALL.iter().map(|a| scores.get(*a)).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_modifiers() {
        let scores = AbilityScores::new(18, 9, 10, 3, 12, 20);
        assert_eq!(scores.modifiers(), AbilityScores::new(4, -1, 0, -4, 1, 5));
        assert_eq!(scores.modifier(Ability::Charisma), 5);
    }
}
