//! Equipment Bonus Resolver
//!
//! Sums the bonus fields of every item currently linked to a character.
//! Callers that act on the result resolve inside their own transaction so
//! the sum reflects the same link set they are about to write against.

use std::ops::Add;

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::core::abilities::AbilityScores;
use crate::core::error::{IntegrityWarning, Result, SheetError};
use crate::database::{fetch_character, fetch_equipped_items, Database, EquippedItemRow};

const EQUIPMENT_LINKS: &str = "character_equipment";

/// Non-ability bonuses granted by equipment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatBonuses {
    pub attack: i32,
    pub damage: i32,
    pub armor_class: i32,
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

impl Add for CombatBonuses {
    type Output = CombatBonuses;

    fn add(self, rhs: CombatBonuses) -> CombatBonuses {
        CombatBonuses {
            attack: self.attack + rhs.attack,
            damage: self.damage + rhs.damage,
            armor_class: self.armor_class + rhs.armor_class,
            fortitude: self.fortitude + rhs.fortitude,
            reflex: self.reflex + rhs.reflex,
            will: self.will + rhs.will,
        }
    }
}

/// Everything the equipped items add up to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EquipmentBonuses {
    pub abilities: AbilityScores,
    pub combat: CombatBonuses,
    /// Number of links that contributed
    pub items: usize,
    pub warnings: Vec<IntegrityWarning>,
}

/// Sum joined equipment rows. Links whose definition is gone are skipped
/// and reported.
pub fn sum_equipment(rows: &[EquippedItemRow]) -> EquipmentBonuses {
    let mut bonuses = EquipmentBonuses::default();

    for row in rows {
        let Some((abilities, combat)) = row_bonuses(row) else {
            bonuses.warnings.push(IntegrityWarning::new(
                EQUIPMENT_LINKS,
                &row.link_id,
                format!("equipment {} does not exist", row.equipment_id),
            ));
            continue;
        };
        bonuses.abilities = bonuses.abilities + abilities;
        bonuses.combat = bonuses.combat + combat;
        bonuses.items += 1;
    }

    bonuses
}

fn row_bonuses(row: &EquippedItemRow) -> Option<(AbilityScores, CombatBonuses)> {
    // Name is NOT NULL in the catalog, so NULL means the join found nothing
    row.name.as_ref()?;
    let abilities = AbilityScores::new(
        row.strength?,
        row.dexterity?,
        row.constitution?,
        row.intelligence?,
        row.wisdom?,
        row.charisma?,
    );
    let combat = CombatBonuses {
        attack: row.attack?,
        damage: row.damage?,
        armor_class: row.armor_class?,
        fortitude: row.fortitude?,
        reflex: row.reflex?,
        will: row.will?,
    };
    Some((abilities, combat))
}

/// Resolve a character's equipment bonuses on an open connection or
/// transaction.
pub async fn resolve_bonuses_in(conn: &mut SqliteConnection, character_id: &str) -> Result<EquipmentBonuses> {
    if fetch_character(conn, character_id).await?.is_none() {
        return Err(SheetError::not_found("character", character_id));
    }

    let rows = fetch_equipped_items(conn, character_id).await?;
    let bonuses = sum_equipment(&rows);
    for warning in &bonuses.warnings {
        tracing::warn!(character_id = %character_id, %warning, "Skipping equipment link");
    }

    tracing::debug!(
        character_id = %character_id,
        links = rows.len(),
        items = bonuses.items,
        "Resolved equipment bonuses"
    );
    Ok(bonuses)
}

/// Read-only access to a character's equipment bonuses.
#[derive(Clone)]
pub struct EquipmentBonusResolver {
    db: Database,
}

impl EquipmentBonusResolver {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve in a transaction of its own.
    pub async fn resolve(&self, character_id: &str) -> Result<EquipmentBonuses> {
        let mut tx = self.db.pool().begin().await?;
        let bonuses = resolve_bonuses_in(&mut tx, character_id).await?;
        tx.commit().await?;
        Ok(bonuses)
    }
}
