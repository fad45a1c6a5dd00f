//! Armor Class Aggregator
//!
//! Partitions worn items by armor type and sums `bonus + defense_value`
//! within each category. Items of the same category stack additively.
//! Also derives the tightest max-Dex-bonus cap among worn items.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::core::error::{IntegrityWarning, Result, SheetError};
use crate::database::{fetch_character, fetch_worn_armor, Database, WornArmorRow};

const ARMOR_LINKS: &str = "character_armors";

/// Category of an AC item, stored as an integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorType {
    Armor = 1,
    Shield = 2,
    Natural = 3,
    Deflection = 4,
    Misc = 5,
}

impl ArmorType {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl TryFrom<i32> for ArmorType {
    type Error = SheetError;

    fn try_from(code: i32) -> Result<Self> {
        match code {
            1 => Ok(ArmorType::Armor),
            2 => Ok(ArmorType::Shield),
            3 => Ok(ArmorType::Natural),
            4 => Ok(ArmorType::Deflection),
            5 => Ok(ArmorType::Misc),
            other => Err(SheetError::integrity(format!("unknown armor type {}", other))),
        }
    }
}

/// Ceiling on the Dex modifier that counts toward AC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DexCap {
    /// No worn item limits Dex
    #[default]
    Unbounded,
    Capped(i32),
}

impl DexCap {
    /// Dex modifier after the cap. Penalties are never raised by a cap.
    pub fn apply(&self, dex_modifier: i32) -> i32 {
        match self {
            DexCap::Unbounded => dex_modifier,
            DexCap::Capped(cap) => dex_modifier.min(*cap),
        }
    }

    /// Tighten with another item's limit.
    pub fn tighten(self, limit: i32) -> DexCap {
        match self {
            DexCap::Unbounded => DexCap::Capped(limit),
            DexCap::Capped(cap) => DexCap::Capped(cap.min(limit)),
        }
    }
}

impl fmt::Display for DexCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DexCap::Unbounded => f.write_str("-"),
            DexCap::Capped(cap) => write!(f, "{:+}", cap),
        }
    }
}

/// AC contributions per category plus the Dex cap
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArmorClassBreakdown {
    pub armor: i32,
    pub shield: i32,
    pub natural: i32,
    pub deflection: i32,
    pub misc: i32,
    pub max_dex_bonus: DexCap,
    pub warnings: Vec<IntegrityWarning>,
}

impl ArmorClassBreakdown {
    /// Sum of all five categories.
    pub fn total(&self) -> i32 {
        self.armor + self.shield + self.natural + self.deflection + self.misc
    }

    /// Categories that still apply against touch attacks.
    pub fn touch_total(&self) -> i32 {
        self.deflection + self.misc
    }

    fn category_mut(&mut self, armor_type: ArmorType) -> &mut i32 {
        match armor_type {
            ArmorType::Armor => &mut self.armor,
            ArmorType::Shield => &mut self.shield,
            ArmorType::Natural => &mut self.natural,
            ArmorType::Deflection => &mut self.deflection,
            ArmorType::Misc => &mut self.misc,
        }
    }
}

/// Fold worn armor rows into a breakdown.
///
/// Rows with a missing definition or unknown type are skipped with a warning.
pub fn sum_armor(rows: &[WornArmorRow]) -> ArmorClassBreakdown {
    let mut breakdown = ArmorClassBreakdown::default();

    for row in rows {
        let (Some(code), Some(bonus), Some(dexterity)) = (row.armor_type, row.bonus, row.dexterity) else {
            breakdown.warnings.push(IntegrityWarning::new(
                ARMOR_LINKS,
                &row.link_id,
                format!("armor {} does not exist", row.armor_id),
            ));
            continue;
        };

        let armor_type = match ArmorType::try_from(code) {
            Ok(armor_type) => armor_type,
            Err(e) => {
                breakdown
                    .warnings
                    .push(IntegrityWarning::from_error(ARMOR_LINKS, &row.link_id, &e));
                continue;
            }
        };

        *breakdown.category_mut(armor_type) += bonus + row.defense_value;

        if dexterity > 0 {
            breakdown.max_dex_bonus = breakdown.max_dex_bonus.tighten(dexterity);
        }
    }

    breakdown
}

/// Aggregate a character's worn armor on an open connection or transaction.
pub async fn aggregate_armor_in(conn: &mut SqliteConnection, character_id: &str) -> Result<ArmorClassBreakdown> {
    if fetch_character(conn, character_id).await?.is_none() {
        return Err(SheetError::not_found("character", character_id));
    }

    let rows = fetch_worn_armor(conn, character_id).await?;
    let breakdown = sum_armor(&rows);
    for warning in &breakdown.warnings {
        tracing::warn!(character_id = %character_id, %warning, "Skipping armor item");
    }

    tracing::debug!(
        character_id = %character_id,
        items = rows.len(),
        total = breakdown.total(),
        max_dex = %breakdown.max_dex_bonus,
        "Aggregated armor class"
    );
    Ok(breakdown)
}

/// Reads worn armor for the character sheet.
#[derive(Clone)]
pub struct ArmorClassAggregator {
    db: Database,
}

impl ArmorClassAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn aggregate(&self, character_id: &str) -> Result<ArmorClassBreakdown> {
        let mut conn = self.db.pool().acquire().await?;
        aggregate_armor_in(&mut conn, character_id).await
    }
}
