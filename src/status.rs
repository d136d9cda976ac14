//! Status effects: haste, exhaustion and the once-per-round overexertion gate

use serde::Serialize;

use crate::combatant::Combatant;
use crate::core::config::RulesConfig;
use crate::core::error::{Result, TrackerError};
use crate::history::{EntryKind, HistoryLog};
use crate::initiative::{InitiativeChange, InitiativeLedger};

/// Status attached to every combatant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusEffects {
    has_haste: bool,
    exhaustion: u32,
    has_overexerted: bool,
}

impl StatusEffects {
    pub fn has_haste(&self) -> bool {
        self.has_haste
    }

    pub fn exhaustion(&self) -> u32 {
        self.exhaustion
    }

    pub fn has_overexerted(&self) -> bool {
        self.has_overexerted
    }

    pub fn can_overexert(&self) -> bool {
        !self.has_overexerted
    }

    /// Flip haste; returns the new state
    pub fn toggle_haste(&mut self) -> bool {
        self.has_haste = !self.has_haste;
        self.has_haste
    }

    /// Shift exhaustion, flooring at zero; returns the new level
    pub fn adjust_exhaustion(&mut self, delta: i32) -> u32 {
        self.exhaustion = (self.exhaustion as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32;
        self.exhaustion
    }

    /// Re-open the overexertion gate. Only the round scheduler calls this.
    pub(crate) fn refresh_for_round(&mut self) {
        self.has_overexerted = false;
    }

    fn mark_overexerted(&mut self, exhaustion: u32) {
        self.has_overexerted = true;
        self.exhaustion = self.exhaustion.saturating_add(exhaustion);
    }
}

/// Result of a successful overexertion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overexertion {
    pub change: InitiativeChange,
    pub exhaustion: u32,
}

/// Trade exhaustion for an immediate initiative boost, once per round
pub fn overexert(
    combatant: &mut Combatant,
    rules: &RulesConfig,
    log: &mut HistoryLog,
) -> Result<Overexertion> {
    if !combatant.status().can_overexert() {
        tracing::debug!(combatant = %combatant.name(), "Overexertion refused");
        return Err(TrackerError::AlreadyOverexerted(combatant.name().to_string()));
    }

    let change = InitiativeLedger::new(rules).gain(combatant, rules.overexert_gain);
    combatant.status_mut().mark_overexerted(rules.overexert_exhaustion);

    log.append(
        EntryKind::Overexertion,
        format!(
            "{} overexerts (+{} initiative, +{} exhaustion)",
            combatant.name(),
            rules.overexert_gain,
            rules.overexert_exhaustion
        ),
    );
    tracing::debug!(
        combatant = %combatant.name(),
        initiative = change.after,
        exhaustion = combatant.exhaustion(),
        "Overexerted"
    );

    Ok(Overexertion {
        change,
        exhaustion: combatant.exhaustion(),
    })
}
