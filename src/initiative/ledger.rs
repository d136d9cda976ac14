//! Initiative arithmetic: rolling, spending, gaining and nudging
//!
//! Every write goes through `clamp`, so `0 <= initiative <= initiative_max`
//! holds after any ledger call.

use rand::Rng;
use serde::Serialize;

use crate::combatant::Combatant;
use crate::core::config::RulesConfig;
use crate::core::error::{Result, TrackerError};
use crate::history::{EntryKind, HistoryLog};

/// Outcome of an initiative roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitiativeRoll {
    pub roll: u32,
    pub modifier: i32,
    /// Value stored on the combatant
    pub value: u32,
    /// Top face of the die: value snapped to the maximum
    pub critical: bool,
}

/// Before/after pair for any initiative write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitiativeChange {
    pub before: u32,
    pub after: u32,
}

impl InitiativeChange {
    pub fn delta(&self) -> i64 {
        self.after as i64 - self.before as i64
    }
}

/// A successful spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpendReceipt {
    pub cost: u32,
    pub interrupting: bool,
    pub change: InitiativeChange,
}

/// Numeric rules applied to a single combatant's initiative
#[derive(Debug, Clone, Copy)]
pub struct InitiativeLedger<'a> {
    rules: &'a RulesConfig,
}

impl<'a> InitiativeLedger<'a> {
    pub fn new(rules: &'a RulesConfig) -> Self {
        Self { rules }
    }

    pub fn max(&self) -> u32 {
        self.rules.initiative_max
    }

    pub fn clamp(&self, value: i64) -> u32 {
        value.clamp(0, self.max() as i64) as u32
    }

    /// Uniform draw in `1..=die_sides`
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.rules.die_sides)
    }

    /// Initiative produced by a die result
    ///
    /// The top face is a hard snap to the maximum, modifier ignored. Any other
    /// face adds the modifier; the sum may exceed the die size but is still
    /// bounded by `0..=initiative_max`.
    pub fn resolve_roll(&self, roll: u32, modifier: i32) -> InitiativeRoll {
        let critical = roll == self.rules.die_sides;
        let value = if critical {
            self.max()
        } else {
            self.clamp(roll as i64 + modifier as i64)
        };
        InitiativeRoll {
            roll,
            modifier,
            value,
            critical,
        }
    }

    /// Roll a fresh die for the combatant and store the result
    pub fn roll<R: Rng + ?Sized>(
        &self,
        combatant: &mut Combatant,
        rng: &mut R,
        log: &mut HistoryLog,
    ) -> InitiativeRoll {
        let roll = self.draw(rng);
        self.apply_roll(combatant, roll, log)
    }

    /// Store an already drawn die result
    pub fn apply_roll(
        &self,
        combatant: &mut Combatant,
        roll: u32,
        log: &mut HistoryLog,
    ) -> InitiativeRoll {
        let outcome = self.resolve_roll(roll, combatant.modifier());
        combatant.set_initiative(outcome.value);

        let modifier = match outcome.modifier {
            0 => String::new(),
            m => format!("{:+}", m),
        };
        log.append(
            EntryKind::Roll,
            format!(
                "{} rolled initiative: {}{} = {}",
                combatant.name(),
                outcome.roll,
                modifier,
                outcome.value
            ),
        );
        tracing::debug!(
            combatant = %combatant.name(),
            roll = outcome.roll,
            initiative = outcome.value,
            critical = outcome.critical,
            "Rolled initiative"
        );
        outcome
    }

    /// Pay `cost` out of the combatant's initiative
    ///
    /// Refused, with no mutation and no history, when the combatant cannot
    /// afford it.
    pub fn spend(
        &self,
        combatant: &mut Combatant,
        cost: u32,
        interrupting: bool,
        log: &mut HistoryLog,
    ) -> Result<SpendReceipt> {
        let before = combatant.initiative();
        if before < cost {
            tracing::debug!(
                combatant = %combatant.name(),
                cost,
                initiative = before,
                "Spend refused"
            );
            return Err(TrackerError::InsufficientInitiative {
                name: combatant.name().to_string(),
                needed: cost,
                available: before,
            });
        }

        let after = self.clamp(before as i64 - cost as i64);
        combatant.set_initiative(after);

        log.append(
            EntryKind::Action,
            format!(
                "{} {}takes action costing {} initiative ({} → {})",
                combatant.name(),
                if interrupting { "interrupts and " } else { "" },
                cost,
                before,
                after
            ),
        );
        tracing::debug!(combatant = %combatant.name(), cost, initiative = after, "Spent initiative");

        Ok(SpendReceipt {
            cost,
            interrupting,
            change: InitiativeChange { before, after },
        })
    }

    /// Add initiative, capped at the maximum. Writes no history: callers
    /// (overexertion, round replenishment) record their own entries.
    pub fn gain(&self, combatant: &mut Combatant, amount: u32) -> InitiativeChange {
        let before = combatant.initiative();
        let after = self.clamp(before as i64 + amount as i64);
        combatant.set_initiative(after);
        InitiativeChange { before, after }
    }

    /// Manual nudge in either direction, clamped to range
    pub fn adjust(
        &self,
        combatant: &mut Combatant,
        delta: i32,
        log: &mut HistoryLog,
    ) -> InitiativeChange {
        let before = combatant.initiative();
        let after = self.clamp(before as i64 + delta as i64);
        combatant.set_initiative(after);

        log.append(
            EntryKind::Adjustment,
            format!(
                "{}'s initiative {} by {} ({} → {})",
                combatant.name(),
                if delta >= 0 { "increased" } else { "decreased" },
                delta.unsigned_abs(),
                before,
                after
            ),
        );
        tracing::debug!(combatant = %combatant.name(), delta, initiative = after, "Adjusted initiative");

        InitiativeChange { before, after }
    }
}
