//! Combatants: the record every other component manipulates
//!
//! A combatant is created from a `CombatantDraft` (the pending "new
//! combatant" form) and then lives in the `CombatantRegistry` until removed.

pub mod registry;

use serde::Serialize;

use crate::core::config::RulesConfig;
use crate::core::types::CombatantId;
use crate::status::StatusEffects;

pub use registry::CombatantRegistry;

/// Initiative modifier implied by a dexterity score: `floor((dex - 10) / 2)`
pub fn modifier_for_dexterity(dexterity: i32) -> i32 {
    (dexterity.saturating_sub(10)).div_euclid(2)
}

/// A combatant in the encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combatant {
    id: CombatantId,
    name: String,
    dexterity: i32,
    modifier: i32,
    initiative: u32,
    is_pc: bool,
    notes: String,
    status: StatusEffects,
}

impl Combatant {
    pub(crate) fn from_draft(id: CombatantId, draft: CombatantDraft) -> Self {
        Self {
            id,
            name: draft.name,
            dexterity: draft.dexterity,
            modifier: draft.modifier,
            initiative: 0,
            is_pc: draft.is_pc,
            notes: String::new(),
            status: StatusEffects::default(),
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dexterity(&self) -> i32 {
        self.dexterity
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Unspent initiative, always within `0..=initiative_max`
    pub fn initiative(&self) -> u32 {
        self.initiative
    }

    /// Cosmetic grouping flag; never consulted by the arithmetic
    pub fn is_pc(&self) -> bool {
        self.is_pc
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn status(&self) -> &StatusEffects {
        &self.status
    }

    pub fn exhaustion(&self) -> u32 {
        self.status.exhaustion()
    }

    pub fn has_haste(&self) -> bool {
        self.status.has_haste()
    }

    pub fn has_overexerted(&self) -> bool {
        self.status.has_overexerted()
    }

    /// Modifier with explicit sign, as shown next to the dexterity score
    pub fn signed_modifier(&self) -> String {
        format!("{:+}", self.modifier)
    }

    pub(crate) fn set_initiative(&mut self, value: u32) {
        self.initiative = value;
    }

    pub(crate) fn set_notes(&mut self, notes: String) {
        self.notes = notes;
    }

    pub(crate) fn status_mut(&mut self) -> &mut StatusEffects {
        &mut self.status
    }
}

/// The pending "new combatant" record
///
/// Dexterity drives the modifier only here, and only until the modifier is
/// set by hand. Existing combatants are never re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatantDraft {
    name: String,
    dexterity: i32,
    modifier: i32,
    modifier_overridden: bool,
    is_pc: bool,
}

impl Default for CombatantDraft {
    /// Starts from the built-in rules' dexterity. `Tracker::draft` starts
    /// from the tracker's loaded rules instead.
    fn default() -> Self {
        Self::with_dexterity("", RulesConfig::default().default_dexterity)
    }
}

impl CombatantDraft {
    /// Named draft with the built-in default dexterity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Draft starting from a rules-provided dexterity
    pub fn with_dexterity(name: impl Into<String>, dexterity: i32) -> Self {
        Self {
            name: name.into(),
            dexterity,
            modifier: modifier_for_dexterity(dexterity),
            modifier_overridden: false,
            is_pc: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn dexterity(mut self, dexterity: i32) -> Self {
        self.set_dexterity(dexterity);
        self
    }

    pub fn modifier(mut self, modifier: i32) -> Self {
        self.set_modifier(modifier);
        self
    }

    pub fn pc(mut self, is_pc: bool) -> Self {
        self.is_pc = is_pc;
        self
    }

    pub fn set_dexterity(&mut self, dexterity: i32) {
        self.dexterity = dexterity;
        if !self.modifier_overridden {
            self.modifier = modifier_for_dexterity(dexterity);
        }
    }

    pub fn set_modifier(&mut self, modifier: i32) {
        self.modifier = modifier;
        self.modifier_overridden = true;
    }

    pub fn current_name(&self) -> &str {
        &self.name
    }

    pub fn current_dexterity(&self) -> i32 {
        self.dexterity
    }

    pub fn current_modifier(&self) -> i32 {
        self.modifier
    }

    pub fn is_pc(&self) -> bool {
        self.is_pc
    }

    pub fn is_modifier_overridden(&self) -> bool {
        self.modifier_overridden
    }

    /// A draft can be submitted once it has a non-blank name
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_derivation_floors() {
        assert_eq!(modifier_for_dexterity(10), 0);
        assert_eq!(modifier_for_dexterity(11), 0);
        assert_eq!(modifier_for_dexterity(16), 3);
        assert_eq!(modifier_for_dexterity(9), -1);
        assert_eq!(modifier_for_dexterity(8), -1);
        assert_eq!(modifier_for_dexterity(1), -5);
        assert_eq!(modifier_for_dexterity(30), 10);
    }

    #[test]
    fn test_draft_defaults() {
        let draft = CombatantDraft::default();
        assert_eq!(draft.current_dexterity(), RulesConfig::default().default_dexterity);
        assert_eq!(draft.current_modifier(), 0);
        assert!(!draft.is_pc());
        assert!(!draft.is_submittable());
    }

    #[test]
    fn test_draft_derives_modifier_until_overridden() {
        let mut draft = CombatantDraft::new("Aria").dexterity(16);
        assert_eq!(draft.current_modifier(), 3);

        draft.set_modifier(5);
        draft.set_dexterity(8);
        assert_eq!(draft.current_dexterity(), 8);
        assert_eq!(draft.current_modifier(), 5);
        assert!(draft.is_modifier_overridden());
    }

    #[test]
    fn test_blank_name_not_submittable() {
        assert!(!CombatantDraft::new("   ").is_submittable());
        assert!(CombatantDraft::new("Goblin").is_submittable());
    }

    #[test]
    fn test_new_combatant_starts_fresh() {
        let draft = CombatantDraft::new("Aria").dexterity(16).pc(true);
        let combatant = Combatant::from_draft(CombatantId::new(), draft);
        assert_eq!(combatant.initiative(), 0);
        assert_eq!(combatant.exhaustion(), 0);
        assert!(!combatant.has_haste());
        assert!(!combatant.has_overexerted());
        assert!(combatant.is_pc());
        assert_eq!(combatant.signed_modifier(), "+3");
        assert_eq!(combatant.notes(), "");
    }
}
