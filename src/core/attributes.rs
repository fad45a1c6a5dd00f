//! Attribute Recomputation Service
//!
//! Keeps the temporary-attribute overlay equal to
//! `base + Σ(bonuses of equipped items)`.
//!
//! Every write follows the same shape inside one transaction, while holding
//! the character's lock:
//!
//! 1. apply the structural change (insert or delete an equipment link)
//! 2. resolve bonuses against the post-change link set
//! 3. read the base attributes
//! 4. overlay = base + bonuses
//! 5. upsert the overlay with exactly those values
//!
//! The overlay is never adjusted by delta. When the link set becomes empty
//! the overlay row is deleted, and readers treat a missing overlay as
//! "attributes equal base".

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqliteConnection;

use crate::config::DatabaseConfig;
use crate::core::abilities::AbilityScores;
use crate::core::equipment::resolve_bonuses_in;
use crate::core::error::{IntegrityWarning, Result, SheetError};
use crate::core::locks::CharacterLocks;
use crate::core::notify::SheetEventEmitter;
use crate::core::sheet::CharacterSheetService;
use crate::database::{
    delete_attribute_overlay, delete_equipment_link, fetch_equipment_definition, insert_equipment_link,
    lock_character, require_attribute_base, upsert_attribute_overlay,
    write_attribute_base, AttributeOverlayRecord, Database, EquipmentLinkRecord, EquipmentOps,
};

/// Result of steps 2-5
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recomputed {
    /// `None` when the character has no equipment links
    pub overlay: Option<AttributeOverlayRecord>,
    pub warnings: Vec<IntegrityWarning>,
}

/// Result of a successful equip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equipped {
    pub link: EquipmentLinkRecord,
    pub overlay: AttributeOverlayRecord,
}

/// Re-derive the overlay of `character_id` from its base attributes and
/// current equipment links.
///
/// Must run inside the caller's write transaction, after the character lock
/// has been taken.
pub async fn recompute_overlay_in(conn: &mut SqliteConnection, character_id: &str) -> Result<Recomputed> {
    let bonuses = resolve_bonuses_in(conn, character_id).await?;
    let base = require_attribute_base(conn, character_id).await?;

    let links = bonuses.items + bonuses.warnings.len();
    if links == 0 {
        let removed = delete_attribute_overlay(conn, character_id).await?;
        tracing::debug!(character_id = %character_id, removed, "No equipment left, overlay cleared");
        return Ok(Recomputed {
            overlay: None,
            warnings: bonuses.warnings,
        });
    }

    let scores = base.scores().checked_add(&bonuses.abilities).ok_or_else(|| {
        SheetError::validation("attributes", "base plus equipment bonuses overflows")
    })?;
    let overlay = AttributeOverlayRecord::from_scores(character_id, scores);
    upsert_attribute_overlay(conn, &overlay).await?;

    tracing::debug!(character_id = %character_id, links, ?scores, "Overlay recomputed");
    Ok(Recomputed {
        overlay: Some(overlay),
        warnings: bonuses.warnings,
    })
}

/// Write side of equipment handling.
#[derive(Clone)]
pub struct AttributeRecomputationService {
    db: Database,
    locks: CharacterLocks,
    lock_timeout: Duration,
    emitter: Option<Arc<dyn SheetEventEmitter>>,
}

impl AttributeRecomputationService {
    pub fn new(db: Database) -> Self {
        Self::with_config(db, &DatabaseConfig::default())
    }

    pub fn with_config(db: Database, config: &DatabaseConfig) -> Self {
        Self {
            db,
            locks: CharacterLocks::new(),
            lock_timeout: Duration::from_millis(config.lock_timeout_ms),
            emitter: None,
        }
    }

    /// Share a lock registry with other services writing the same characters.
    pub fn with_locks(mut self, locks: CharacterLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn SheetEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn locks(&self) -> &CharacterLocks {
        &self.locks
    }

    /// Attach `equipment_id` to the character and recompute its overlay.
    pub async fn on_equip(
        &self,
        character_id: &str,
        equipment_id: &str,
        description: Option<&str>,
    ) -> Result<Equipped> {
        let link = EquipmentLinkRecord::new(character_id, equipment_id, description.map(str::to_string));

        let recomputed: Result<Recomputed> = async {
            let _guard = self.locks.acquire(character_id, self.lock_timeout).await?;
            let mut tx = self.db.pool().begin().await?;

            lock_character(&mut tx, character_id).await?;
            if fetch_equipment_definition(&mut tx, equipment_id).await?.is_none() {
                return Err(SheetError::not_found("equipment", equipment_id));
            }
            insert_equipment_link(&mut tx, &link).await?;

            let recomputed = recompute_overlay_in(&mut tx, character_id).await?;
            tx.commit().await?;
            Ok::<_, SheetError>(recomputed)
        }
        .await;
        let recomputed = recomputed.map_err(|e| attribute_conflict(e, character_id))?;

        let overlay = recomputed
            .overlay
            .ok_or_else(|| SheetError::integrity(format!("no overlay after equipping link {}", link.id)))?;

        tracing::info!(
            character_id = %character_id,
            equipment_id = %equipment_id,
            link_id = %link.id,
            "Equipment attached"
        );
        self.notify(character_id).await;

        Ok(Equipped { link, overlay })
    }

    /// Detach an equipment link and recompute the owner's overlay.
    ///
    /// Returns `None` when the character has nothing equipped afterwards.
    pub async fn on_unequip(&self, link_id: &str) -> Result<Option<AttributeOverlayRecord>> {
        let link = self
            .db
            .get_equipment_link(link_id)
            .await?
            .ok_or_else(|| SheetError::not_found("equipment link", link_id))?;
        let character_id = link.character_id.as_str();

        let recomputed: Result<Recomputed> = async {
            let _guard = self.locks.acquire(character_id, self.lock_timeout).await?;
            let mut tx = self.db.pool().begin().await?;

            lock_character(&mut tx, character_id).await?;
            // A concurrent unequip may have won the lock first
            if !delete_equipment_link(&mut tx, link_id).await? {
                return Err(SheetError::not_found("equipment link", link_id));
            }

            let recomputed = recompute_overlay_in(&mut tx, character_id).await?;
            tx.commit().await?;
            Ok::<_, SheetError>(recomputed)
        }
        .await;
        let recomputed = recomputed.map_err(|e| attribute_conflict(e, character_id))?;

        tracing::info!(
            character_id = %character_id,
            link_id = %link_id,
            overlay = recomputed.overlay.is_some(),
            "Equipment detached"
        );
        self.notify(character_id).await;

        Ok(recomputed.overlay)
    }

    /// Re-derive the overlay without changing any link.
    pub async fn recompute(&self, character_id: &str) -> Result<Recomputed> {
        let recomputed: Result<Recomputed> = async {
            let _guard = self.locks.acquire(character_id, self.lock_timeout).await?;
            let mut tx = self.db.pool().begin().await?;

            lock_character(&mut tx, character_id).await?;
            let recomputed = recompute_overlay_in(&mut tx, character_id).await?;
            tx.commit().await?;
            Ok::<_, SheetError>(recomputed)
        }
        .await;
        let recomputed = recomputed.map_err(|e| attribute_conflict(e, character_id))?;

        tracing::info!(character_id = %character_id, "Overlay recomputed on request");
        Ok(recomputed)
    }

    /// Replace the base attributes and recompute the overlay in the same
    /// transaction.
    pub async fn update_base(&self, character_id: &str, scores: &AbilityScores) -> Result<Option<AttributeOverlayRecord>> {
        let recomputed: Result<Recomputed> = async {
            let _guard = self.locks.acquire(character_id, self.lock_timeout).await?;
            let mut tx = self.db.pool().begin().await?;

            lock_character(&mut tx, character_id).await?;
            write_attribute_base(&mut tx, character_id, scores).await?;
            let recomputed = recompute_overlay_in(&mut tx, character_id).await?;
            tx.commit().await?;
            Ok::<_, SheetError>(recomputed)
        }
        .await;
        let recomputed = recomputed.map_err(|e| attribute_conflict(e, character_id))?;

        tracing::info!(character_id = %character_id, ?scores, "Base attributes updated");
        self.notify(character_id).await;

        Ok(recomputed.overlay)
    }

    async fn notify(&self, character_id: &str) {
        let Some(emitter) = &self.emitter else {
            return;
        };

        let view = match CharacterSheetService::new(self.db.clone()).combat_view(character_id).await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(character_id = %character_id, error = %e, "Could not build view for notification");
                return;
            }
        };

        if let Err(e) = emitter.emit(&view) {
            tracing::warn!(character_id = %character_id, error = %e, "Sheet notification failed");
        }
    }
}

/// Attach the character id to store-level conflicts.
fn attribute_conflict(error: SheetError, character_id: &str) -> SheetError {
    match error {
        SheetError::Conflict { character_id: id, reason } if id.is_empty() => {
            SheetError::conflict(character_id, reason)
        }
        other => other,
    }
}
