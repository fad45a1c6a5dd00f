//! Class Progression Aggregator
//!
//! Sums base attack and base save bonuses across every class a character
//! holds. Each class names a progression tier per axis; the tier selects the
//! column of the per-level table that the class level contributes.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::core::error::{IntegrityWarning, Result, SheetError};
use crate::database::{
    fetch_base_attacks, fetch_base_resists, fetch_character, fetch_class_level_rows, BaseAttackRecord,
    BaseResistRecord, ClassLevelRow, Database,
};

const CLASS_LEVELS: &str = "character_classes";

// ============================================================================
// Progression Tiers
// ============================================================================

/// Attack progression tier of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackProgression {
    Low,
    Medium,
    High,
}

impl AttackProgression {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttackProgression::Low => "low",
            AttackProgression::Medium => "medium",
            AttackProgression::High => "high",
        }
    }
}

impl FromStr for AttackProgression {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(AttackProgression::Low),
            "medium" => Ok(AttackProgression::Medium),
            "high" => Ok(AttackProgression::High),
            other => Err(SheetError::integrity(format!("unknown attack progression '{}'", other))),
        }
    }
}

impl fmt::Display for AttackProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Saving throw progression tier of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveProgression {
    Low,
    High,
}

impl SaveProgression {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveProgression::Low => "low",
            SaveProgression::High => "high",
        }
    }
}

impl FromStr for SaveProgression {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(SaveProgression::Low),
            "high" => Ok(SaveProgression::High),
            other => Err(SheetError::integrity(format!("unknown save progression '{}'", other))),
        }
    }
}

impl fmt::Display for SaveProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BaseAttackRecord {
    pub fn value(&self, progression: AttackProgression) -> i32 {
        match progression {
            AttackProgression::Low => self.low,
            AttackProgression::Medium => self.medium,
            AttackProgression::High => self.high,
        }
    }
}

impl BaseResistRecord {
    pub fn value(&self, progression: SaveProgression) -> i32 {
        match progression {
            SaveProgression::Low => self.low,
            SaveProgression::High => self.high,
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Summed progressions over all classes of a character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressionTotals {
    pub base_attack: i32,
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
    pub warnings: Vec<IntegrityWarning>,
}

/// Sum class levels against the progression rows fetched for their levels.
///
/// A level with no table row contributes 0. A class level whose class is
/// missing, or whose selector does not parse, contributes 0 on the affected
/// axes and adds a warning.
pub fn sum_progressions(
    class_levels: &[ClassLevelRow],
    attacks: &[BaseAttackRecord],
    resists: &[BaseResistRecord],
) -> ProgressionTotals {
    let attacks: HashMap<i32, &BaseAttackRecord> = attacks.iter().map(|r| (r.level, r)).collect();
    let resists: HashMap<i32, &BaseResistRecord> = resists.iter().map(|r| (r.level, r)).collect();

    let mut totals = ProgressionTotals::default();

    for row in class_levels {
        let (Some(attack), Some(fortitude), Some(reflex), Some(will)) =
            (&row.attack, &row.fortitude, &row.reflex, &row.will)
        else {
            totals.warnings.push(IntegrityWarning::new(
                CLASS_LEVELS,
                &row.class_level_id,
                format!("class {} does not exist", row.class_id),
            ));
            continue;
        };

        let attack_row = attacks.get(&row.level);
        let resist_row = resists.get(&row.level);

        match attack.parse::<AttackProgression>() {
            Ok(tier) => totals.base_attack += attack_row.map(|r| r.value(tier)).unwrap_or(0),
            Err(e) => totals
                .warnings
                .push(IntegrityWarning::from_error(CLASS_LEVELS, &row.class_level_id, &e)),
        }

        for (selector, total) in [
            (fortitude, &mut totals.fortitude),
            (reflex, &mut totals.reflex),
            (will, &mut totals.will),
        ] {
            match selector.parse::<SaveProgression>() {
                Ok(tier) => *total += resist_row.map(|r| r.value(tier)).unwrap_or(0),
                Err(e) => totals
                    .warnings
                    .push(IntegrityWarning::from_error(CLASS_LEVELS, &row.class_level_id, &e)),
            }
        }
    }

    totals
}

/// Aggregate a character's progressions on an open connection or transaction.
pub async fn aggregate_progressions_in(
    conn: &mut SqliteConnection,
    character_id: &str,
) -> Result<ProgressionTotals> {
    if fetch_character(conn, character_id).await?.is_none() {
        return Err(SheetError::not_found("character", character_id));
    }

    let class_levels = fetch_class_level_rows(conn, character_id).await?;
    let levels: Vec<i32> = class_levels
        .iter()
        .map(|row| row.level)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let attacks = fetch_base_attacks(conn, &levels).await?;
    let resists = fetch_base_resists(conn, &levels).await?;

    let totals = sum_progressions(&class_levels, &attacks, &resists);
    for warning in &totals.warnings {
        tracing::warn!(character_id = %character_id, %warning, "Skipping class progression");
    }

    tracing::debug!(
        character_id = %character_id,
        classes = class_levels.len(),
        base_attack = totals.base_attack,
        "Aggregated class progressions"
    );
    Ok(totals)
}

/// Reads class levels and progression tables for the character sheet.
#[derive(Clone)]
pub struct ClassProgressionAggregator {
    db: Database,
}

impl ClassProgressionAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn aggregate(&self, character_id: &str) -> Result<ProgressionTotals> {
        let mut conn = self.db.pool().acquire().await?;
        aggregate_progressions_in(&mut conn, character_id).await
    }
}
