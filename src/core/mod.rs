//! Character sheet engine: ability math, aggregation and recomputation.

pub mod abilities;
pub mod armor_class;
pub mod attributes;
pub mod equipment;
pub mod error;
pub mod locks;
pub mod logging;
pub mod notify;
pub mod progression;
pub mod sheet;

pub use abilities::{modifier, Ability, AbilityScores};
pub use armor_class::{ArmorClassAggregator, ArmorClassBreakdown, ArmorType, DexCap};
pub use attributes::{AttributeRecomputationService, Equipped, Recomputed};
pub use equipment::{CombatBonuses, EquipmentBonusResolver, EquipmentBonuses};
pub use error::{IntegrityWarning, Result, SheetError};
pub use locks::{CharacterGuard, CharacterLocks};
pub use notify::{ChannelEmitter, SheetEventEmitter};
pub use progression::{AttackProgression, ClassProgressionAggregator, ProgressionTotals, SaveProgression};
pub use sheet::{CharacterSheetService, CombatView};
