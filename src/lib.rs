//! Ready Up - initiative as a spendable, replenishing resource
//!
//! Combatants bank initiative each round and spend it to act; whoever holds
//! the most unspent initiative goes next. `Tracker` is the entry point.

pub mod combatant;
pub mod command;
pub mod core;
pub mod history;
pub mod initiative;
pub mod ordering;
pub mod round;
pub mod status;
pub mod tracker;

pub use crate::combatant::{Combatant, CombatantDraft, CombatantRegistry};
pub use crate::core::{CombatantId, Result, RulesConfig, TrackerError, INITIATIVE_MAX};
pub use crate::history::{EntryKind, HistoryEntry, HistoryLog};
pub use crate::initiative::{ActionCost, ActionCostCalculator, ActionPreset};
pub use crate::tracker::{Tracker, TrackerSnapshot};
