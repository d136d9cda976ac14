//! The ready-up tracker: one owner for the whole initiative economy
//!
//! All state lives behind `&mut self`, so every operation runs to completion
//! before anything can read the tracker again. Batch operations (`roll_all`,
//! `new_round`) are therefore never observable half-applied.
//!
//! Operations addressed by id treat a missing combatant as a rejection
//! (`CombatantNotFound`) with no side effects.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::combatant::{Combatant, CombatantDraft, CombatantRegistry};
use crate::core::config::RulesConfig;
use crate::core::error::{Result, TrackerError};
use crate::core::types::{CombatantId, Round};
use crate::history::{HistoryEntry, HistoryLog};
use crate::initiative::{
    ActionCost, ActionCostCalculator, InitiativeChange, InitiativeLedger, InitiativeRoll,
    SpendReceipt,
};
use crate::ordering;
use crate::round::{RoundScheduler, RoundSummary};
use crate::status::{self, Overexertion};

pub struct Tracker {
    rules: RulesConfig,
    registry: CombatantRegistry,
    history: HistoryLog,
    scheduler: RoundScheduler,
    interrupt_mode: bool,
    rng: ChaCha8Rng,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::build(RulesConfig::default(), ChaCha8Rng::from_entropy())
    }
}

impl Tracker {
    /// Tracker with entropy-seeded dice
    pub fn new(rules: RulesConfig) -> Result<Self> {
        Self::with_rng(rules, ChaCha8Rng::from_entropy())
    }

    /// Tracker with deterministic dice
    pub fn with_seed(rules: RulesConfig, seed: u64) -> Result<Self> {
        Self::with_rng(rules, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Rules are checked here, so nothing downstream has to handle a die
    /// without faces or a zero ceiling.
    fn with_rng(rules: RulesConfig, rng: ChaCha8Rng) -> Result<Self> {
        rules.validate().map_err(TrackerError::InvalidRules)?;
        Ok(Self::build(rules, rng))
    }

    fn build(rules: RulesConfig, rng: ChaCha8Rng) -> Self {
        Self {
            rules,
            registry: CombatantRegistry::new(),
            history: HistoryLog::new(),
            scheduler: RoundScheduler::new(),
            interrupt_mode: false,
            rng,
        }
    }

    // === QUERIES ===

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    pub fn round(&self) -> Round {
        self.scheduler.round()
    }

    pub fn interrupt_mode(&self) -> bool {
        self.interrupt_mode
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn registry(&self) -> &CombatantRegistry {
        &self.registry
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.registry.find(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Current turn order, recomputed from live state on every call
    pub fn turn_order(&self) -> Vec<&Combatant> {
        ordering::turn_order(self.registry.as_slice())
    }

    pub fn next_actor(&self) -> Option<&Combatant> {
        ordering::next_actor(self.registry.as_slice())
    }

    /// A fresh draft seeded with the configured default dexterity
    pub fn draft(&self) -> CombatantDraft {
        CombatantDraft::with_dexterity("", self.rules.default_dexterity)
    }

    /// Cost an action would be charged right now
    pub fn quote(&self, cost: ActionCost) -> u32 {
        ActionCostCalculator::from_rules(&self.rules).cost_of(cost, self.interrupt_mode)
    }

    /// Whether the combatant could pay for the action right now
    pub fn can_afford(&self, id: CombatantId, cost: ActionCost) -> bool {
        self.registry
            .find(id)
            .is_some_and(|c| c.initiative() >= self.quote(cost))
    }

    pub fn snapshot(&self) -> TrackerSnapshot<'_> {
        TrackerSnapshot {
            round: self.round(),
            interrupt_mode: self.interrupt_mode,
            combatants: self.turn_order(),
            history: self.history.entries(),
        }
    }

    // === REGISTRY ===

    pub fn add_combatant(&mut self, draft: CombatantDraft) -> Result<CombatantId> {
        let id = self.registry.add(draft)?.id();
        Ok(id)
    }

    /// Remove a combatant. Always safe to call; a shell holding `id` as its
    /// selection must drop it when this returns `Some`.
    pub fn remove_combatant(&mut self, id: CombatantId) -> Option<Combatant> {
        self.registry.remove(id)
    }

    pub fn update_notes(&mut self, id: CombatantId, notes: impl Into<String>) -> bool {
        self.registry.update_notes(id, notes)
    }

    // === INITIATIVE ===

    pub fn roll_initiative(&mut self, id: CombatantId) -> Result<InitiativeRoll> {
        let ledger = InitiativeLedger::new(&self.rules);
        let combatant = self.registry.require_mut(id)?;
        Ok(ledger.roll(combatant, &mut self.rng, &mut self.history))
    }

    /// Roll for every combatant in registry order, one history entry each
    pub fn roll_all(&mut self) -> Vec<(CombatantId, InitiativeRoll)> {
        let ledger = InitiativeLedger::new(&self.rules);
        let draws: Vec<u32> = (0..self.registry.len())
            .map(|_| ledger.draw(&mut self.rng))
            .collect();

        let outcomes: Vec<(CombatantId, InitiativeRoll)> = self
            .registry
            .iter_mut()
            .zip(draws)
            .map(|(combatant, roll)| {
                let outcome = ledger.apply_roll(combatant, roll, &mut self.history);
                (combatant.id(), outcome)
            })
            .collect();

        tracing::info!(count = outcomes.len(), "Rolled initiative for all combatants");
        outcomes
    }

    /// Pay for an action, applying the interrupt surcharge when it applies
    pub fn take_action(&mut self, id: CombatantId, cost: ActionCost) -> Result<SpendReceipt> {
        if let ActionCost::Custom(raw) = cost {
            ActionCost::custom(i64::from(raw), self.rules.initiative_max)?;
        }
        let final_cost = self.quote(cost);
        let interrupting = self.interrupt_mode;
        let ledger = InitiativeLedger::new(&self.rules);
        let combatant = self.registry.require_mut(id)?;
        ledger.spend(combatant, final_cost, interrupting, &mut self.history)
    }

    /// Pay a raw custom cost; zero, negative or oversized costs are rejected
    pub fn take_custom_action(&mut self, id: CombatantId, raw_cost: i64) -> Result<SpendReceipt> {
        match ActionCost::custom(raw_cost, self.rules.initiative_max) {
            Ok(cost) => self.take_action(id, cost),
            Err(e) => {
                tracing::debug!(raw_cost, "Custom cost rejected");
                Err(e)
            }
        }
    }

    pub fn adjust_initiative(&mut self, id: CombatantId, delta: i32) -> Result<InitiativeChange> {
        let ledger = InitiativeLedger::new(&self.rules);
        let combatant = self.registry.require_mut(id)?;
        Ok(ledger.adjust(combatant, delta, &mut self.history))
    }

    // === STATUS ===

    pub fn toggle_haste(&mut self, id: CombatantId) -> Result<bool> {
        let combatant = self.registry.require_mut(id)?;
        let hasted = combatant.status_mut().toggle_haste();
        tracing::debug!(combatant = %combatant.name(), hasted, "Toggled haste");
        Ok(hasted)
    }

    pub fn overexert(&mut self, id: CombatantId) -> Result<Overexertion> {
        let combatant = self.registry.require_mut(id)?;
        status::overexert(combatant, &self.rules, &mut self.history)
    }

    pub fn adjust_exhaustion(&mut self, id: CombatantId, delta: i32) -> Result<u32> {
        let combatant = self.registry.require_mut(id)?;
        let level = combatant.status_mut().adjust_exhaustion(delta);
        tracing::debug!(combatant = %combatant.name(), exhaustion = level, "Adjusted exhaustion");
        Ok(level)
    }

    // === ENGINE STATE ===

    pub fn set_interrupt_mode(&mut self, enabled: bool) {
        self.interrupt_mode = enabled;
    }

    /// Flip interrupt mode; returns the new state
    pub fn toggle_interrupt_mode(&mut self) -> bool {
        self.interrupt_mode = !self.interrupt_mode;
        tracing::debug!(interrupt_mode = self.interrupt_mode, "Toggled interrupt mode");
        self.interrupt_mode
    }

    pub fn new_round(&mut self) -> RoundSummary {
        self.scheduler
            .advance(&mut self.registry, &self.rules, &mut self.history)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Unconditional reset; confirming with the user is the caller's job
    pub fn reset(&mut self) {
        self.registry.clear();
        self.history.clear();
        self.scheduler.reset();
        self.interrupt_mode = false;
        tracing::info!("Tracker reset");
    }
}

/// Serialisable view of the tracker for renderers
#[derive(Debug, Serialize)]
pub struct TrackerSnapshot<'a> {
    pub round: Round,
    pub interrupt_mode: bool,
    /// In turn order
    pub combatants: Vec<&'a Combatant>,
    pub history: &'a [HistoryEntry],
}

impl TrackerSnapshot<'_> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(TrackerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::EntryKind;
    use crate::initiative::ActionPreset;

    fn tracker() -> Tracker {
        Tracker::with_seed(RulesConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_fresh_tracker() {
        let tracker = tracker();
        assert_eq!(tracker.round(), 1);
        assert!(!tracker.interrupt_mode());
        assert!(tracker.is_empty());
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_add_logs_nothing() {
        let mut tracker = tracker();
        tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        assert!(tracker.history().is_empty());
        assert!(matches!(
            tracker.add_combatant(CombatantDraft::new("")),
            Err(TrackerError::EmptyName)
        ));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_missing_combatant_is_rejected_quietly() {
        let mut tracker = tracker();
        let ghost = CombatantId::new();
        assert!(matches!(
            tracker.roll_initiative(ghost),
            Err(TrackerError::CombatantNotFound(_))
        ));
        assert!(tracker.take_action(ghost, ActionPreset::Action.into()).is_err());
        assert!(tracker.overexert(ghost).is_err());
        assert!(tracker.adjust_initiative(ghost, 3).is_err());
        assert!(tracker.toggle_haste(ghost).is_err());
        assert!(tracker.adjust_exhaustion(ghost, 1).is_err());
        assert!(!tracker.update_notes(ghost, "gone"));
        assert!(tracker.remove_combatant(ghost).is_none());
        assert!(tracker.history().is_empty());
    }

    #[test]
    fn test_interrupt_mode_surcharges_and_frames() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.adjust_initiative(id, 20).unwrap();

        tracker.toggle_interrupt_mode();
        assert_eq!(tracker.quote(ActionPreset::Action.into()), 8);
        assert_eq!(tracker.quote(ActionPreset::Reaction.into()), 3);

        let receipt = tracker.take_action(id, ActionPreset::Action.into()).unwrap();
        assert_eq!(receipt.cost, 8);
        assert!(receipt.interrupting);
        assert_eq!(tracker.combatant(id).unwrap().initiative(), 12);
        assert!(tracker.interrupt_mode(), "interrupt mode persists until toggled");

        let receipt = tracker.take_action(id, ActionPreset::Dodge.into()).unwrap();
        assert_eq!(receipt.cost, 3);
        assert_eq!(
            tracker.history().last().unwrap().text(),
            "Aria interrupts and takes action costing 3 initiative (12 → 9)"
        );
    }

    #[test]
    fn test_custom_cost_validation() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.adjust_initiative(id, 10).unwrap();
        let entries = tracker.history().len();

        assert!(matches!(
            tracker.take_custom_action(id, 0),
            Err(TrackerError::InvalidCost(0))
        ));
        assert!(tracker.take_custom_action(id, -4).is_err());
        assert_eq!(tracker.history().len(), entries);
        assert_eq!(tracker.combatant(id).unwrap().initiative(), 10);

        tracker.take_custom_action(id, 4).unwrap();
        assert_eq!(tracker.combatant(id).unwrap().initiative(), 6);
    }

    #[test]
    fn test_can_afford_tracks_interrupt_mode() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.adjust_initiative(id, 7).unwrap();

        assert!(tracker.can_afford(id, ActionPreset::Action.into()));
        tracker.set_interrupt_mode(true);
        assert!(!tracker.can_afford(id, ActionPreset::Action.into()));
        assert!(tracker.can_afford(id, ActionPreset::Reaction.into()));
        assert!(!tracker.can_afford(CombatantId::new(), ActionPreset::Step.into()));
    }

    #[test]
    fn test_roll_all_logs_each_in_registry_order() {
        let mut tracker = tracker();
        tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.add_combatant(CombatantDraft::new("Bram")).unwrap();
        tracker.add_combatant(CombatantDraft::new("Cato")).unwrap();

        let outcomes = tracker.roll_all();
        assert_eq!(outcomes.len(), 3);
        let rolls: Vec<&str> = tracker
            .history()
            .entries_of_kind(EntryKind::Roll)
            .map(|e| e.text())
            .collect();
        assert_eq!(rolls.len(), 3);
        assert!(rolls[0].starts_with("Aria"));
        assert!(rolls[1].starts_with("Bram"));
        assert!(rolls[2].starts_with("Cato"));

        for (id, outcome) in outcomes {
            assert_eq!(tracker.combatant(id).unwrap().initiative(), outcome.value);
        }
    }

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = tracker();
        let mut b = tracker();
        for t in [&mut a, &mut b] {
            t.add_combatant(CombatantDraft::new("Aria")).unwrap();
            t.add_combatant(CombatantDraft::new("Bram")).unwrap();
            t.roll_all();
        }
        let texts = |t: &Tracker| -> Vec<String> {
            t.history().iter().map(|e| e.text().to_string()).collect()
        };
        assert_eq!(texts(&a), texts(&b));
    }

    #[test]
    fn test_notes_and_haste_write_no_history() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        assert!(tracker.update_notes(id, "Blessed"));
        assert!(tracker.toggle_haste(id).unwrap());
        assert_eq!(tracker.adjust_exhaustion(id, -2).unwrap(), 0);
        assert!(tracker.history().is_empty());
        assert_eq!(tracker.combatant(id).unwrap().notes(), "Blessed");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.roll_initiative(id).unwrap();
        tracker.new_round();
        tracker.toggle_interrupt_mode();

        tracker.reset();
        assert!(tracker.is_empty());
        assert!(tracker.history().is_empty());
        assert_eq!(tracker.round(), 1);
        assert!(!tracker.interrupt_mode());
    }

    #[test]
    fn test_clear_history_keeps_combatants() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.roll_initiative(id).unwrap();
        tracker.clear_history();
        assert!(tracker.history().is_empty());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_snapshot_is_in_turn_order() {
        let mut tracker = tracker();
        let slow = tracker.add_combatant(CombatantDraft::new("Slow")).unwrap();
        let fast = tracker.add_combatant(CombatantDraft::new("Fast")).unwrap();
        tracker.adjust_initiative(slow, 2).unwrap();
        tracker.adjust_initiative(fast, 9).unwrap();

        let snapshot = tracker.snapshot();
        let names: Vec<&str> = snapshot.combatants.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Fast", "Slow"]);

        let json = snapshot.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["round"], 1);
        assert_eq!(value["combatants"][0]["name"], "Fast");
        assert_eq!(value["history"].as_array().map(|h| h.len()), Some(2));
    }

    #[test]
    fn test_draft_uses_configured_dexterity() {
        let rules = RulesConfig {
            default_dexterity: 14,
            ..RulesConfig::default()
        };
        let tracker = Tracker::with_seed(rules, 1).unwrap();
        let draft = tracker.draft();
        assert_eq!(draft.current_dexterity(), 14);
        assert_eq!(draft.current_modifier(), 2);
    }

    #[test]
    fn test_default_rules_draft_matches_plain_draft() {
        assert_eq!(tracker().draft(), CombatantDraft::default());
    }

    #[test]
    fn test_faceless_die_rejected_at_construction() {
        let rules = RulesConfig {
            die_sides: 0,
            ..RulesConfig::default()
        };
        assert!(matches!(
            Tracker::with_seed(rules.clone(), 1),
            Err(TrackerError::InvalidRules(_))
        ));
        assert!(matches!(Tracker::new(rules), Err(TrackerError::InvalidRules(_))));

        let zero_ceiling = RulesConfig {
            initiative_max: 0,
            ..RulesConfig::default()
        };
        assert!(Tracker::with_seed(zero_ceiling, 1).is_err());
    }

    #[test]
    fn test_default_tracker_rolls_with_default_die() {
        let mut tracker = Tracker::default();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        let roll = tracker.roll_initiative(id).unwrap();
        assert!((1..=20).contains(&roll.roll));
    }

    #[test]
    fn test_custom_cost_bounded_by_configured_max() {
        let rules = RulesConfig {
            initiative_max: 30,
            round_gain: 10,
            ..RulesConfig::default()
        };
        let mut tracker = Tracker::with_seed(rules, 1).unwrap();
        let id = tracker.add_combatant(CombatantDraft::new("Titan")).unwrap();
        tracker.adjust_initiative(id, 30).unwrap();

        let receipt = tracker.take_custom_action(id, 28).unwrap();
        assert_eq!(receipt.change.after, 2);
        assert!(matches!(
            tracker.take_custom_action(id, 31),
            Err(TrackerError::InvalidCost(31))
        ));
    }

    #[test]
    fn test_parsed_custom_cost_checked_against_rules() {
        let mut tracker = tracker();
        let id = tracker.add_combatant(CombatantDraft::new("Aria")).unwrap();
        tracker.adjust_initiative(id, 25).unwrap();
        let entries = tracker.history().len();

        let err = tracker.take_action(id, ActionCost::Custom(26)).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidCost(26)));
        assert!(err.is_rejection());
        assert_eq!(tracker.combatant(id).unwrap().initiative(), 25);
        assert_eq!(tracker.history().len(), entries);
    }
}
