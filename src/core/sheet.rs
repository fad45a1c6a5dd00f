//! Character Sheet Service
//!
//! Builds the read-only combat view of a character from one consistent
//! snapshot: effective attributes (overlay, or base when no overlay exists),
//! class progressions, worn armor and equipment combat bonuses.

use serde::Serialize;
use sqlx::SqliteConnection;

use crate::core::abilities::{Ability, AbilityScores};
use crate::core::armor_class::{aggregate_armor_in, ArmorClassBreakdown};
use crate::core::equipment::{resolve_bonuses_in, CombatBonuses, EquipmentBonuses};
use crate::core::error::{IntegrityWarning, Result, SheetError};
use crate::core::progression::{aggregate_progressions_in, ProgressionTotals};
use crate::database::{
    fetch_attribute_overlay, fetch_character, require_attribute_base, AttributeBaseRecord, AttributeOverlayRecord,
    CharacterRecord, Database,
};

/// Armor class before any bonus
pub const BASE_ARMOR_CLASS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavingThrows {
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
}

/// Combat-ready numbers for one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatView {
    pub character_id: String,
    pub name: String,
    pub level: i32,
    pub hit_points: HitPoints,

    pub base_attributes: AbilityScores,
    /// Base plus equipment; equals base when nothing is equipped
    pub attributes: AbilityScores,
    pub has_overlay: bool,
    pub modifiers: AbilityScores,

    pub base_attack: i32,
    pub melee_attack: i32,
    pub ranged_attack: i32,
    pub damage_bonus: i32,
    pub initiative: i32,
    pub saves: SavingThrows,

    pub armor: ArmorClassBreakdown,
    pub dex_to_ac: i32,
    pub armor_class: i32,
    pub touch_ac: i32,
    pub flat_footed_ac: i32,

    pub equipment: CombatBonuses,
    pub warnings: Vec<IntegrityWarning>,
}

impl CombatView {
    /// Compose the view from already-aggregated parts.
    pub fn compose(
        character: &CharacterRecord,
        base: &AttributeBaseRecord,
        overlay: Option<&AttributeOverlayRecord>,
        mut progression: ProgressionTotals,
        mut armor: ArmorClassBreakdown,
        mut equipment: EquipmentBonuses,
    ) -> Self {
        let base_attributes = base.scores();
        let attributes = overlay.map(AttributeOverlayRecord::scores).unwrap_or(base_attributes);
        let modifiers = attributes.modifiers();
        let gear = equipment.combat;

        let str_mod = modifiers.get(Ability::Strength);
        let dex_mod = modifiers.get(Ability::Dexterity);
        let con_mod = modifiers.get(Ability::Constitution);
        let wis_mod = modifiers.get(Ability::Wisdom);

        let dex_to_ac = armor.max_dex_bonus.apply(dex_mod);
        let armor_class = BASE_ARMOR_CLASS + armor.total() + dex_to_ac + gear.armor_class;
        let touch_ac = BASE_ARMOR_CLASS + armor.touch_total() + dex_to_ac;
        let flat_footed_ac = armor_class - dex_to_ac.max(0);

        let mut warnings = std::mem::take(&mut progression.warnings);
        warnings.append(&mut armor.warnings);
        warnings.append(&mut equipment.warnings);

        Self {
            character_id: character.id.clone(),
            name: character.name.clone(),
            level: character.level,
            hit_points: HitPoints {
                max: character.hit_points_max,
                current: character.hit_points_current,
            },
            base_attributes,
            attributes,
            has_overlay: overlay.is_some(),
            modifiers,
            base_attack: progression.base_attack,
            melee_attack: progression.base_attack + str_mod + gear.attack,
            ranged_attack: progression.base_attack + dex_mod + gear.attack,
            damage_bonus: str_mod + gear.damage,
            initiative: dex_mod,
            saves: SavingThrows {
                fortitude: progression.fortitude + con_mod + gear.fortitude,
                reflex: progression.reflex + dex_mod + gear.reflex,
                will: progression.will + wis_mod + gear.will,
            },
            armor,
            dex_to_ac,
            armor_class,
            touch_ac,
            flat_footed_ac,
            equipment: gear,
            warnings,
        }
    }
}

/// Build the combat view on an open connection or transaction.
pub async fn combat_view_in(conn: &mut SqliteConnection, character_id: &str) -> Result<CombatView> {
    let character = fetch_character(conn, character_id)
        .await?
        .ok_or_else(|| SheetError::not_found("character", character_id))?;
    let base = require_attribute_base(conn, character_id).await?;
    let overlay = fetch_attribute_overlay(conn, character_id).await?;

    let progression = aggregate_progressions_in(conn, character_id).await?;
    let armor = aggregate_armor_in(conn, character_id).await?;
    let equipment = resolve_bonuses_in(conn, character_id).await?;

    Ok(CombatView::compose(
        &character,
        &base,
        overlay.as_ref(),
        progression,
        armor,
        equipment,
    ))
}

/// Read side of the character sheet.
#[derive(Clone)]
pub struct CharacterSheetService {
    db: Database,
}

impl CharacterSheetService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Current combat view, read from a single transaction.
    pub async fn combat_view(&self, character_id: &str) -> Result<CombatView> {
        let mut tx = self.db.pool().begin().await?;
        let view = combat_view_in(&mut tx, character_id).await?;
        tx.commit().await?;

        tracing::debug!(
            character_id = %character_id,
            armor_class = view.armor_class,
            warnings = view.warnings.len(),
            "Built combat view"
        );
        Ok(view)
    }
}
