//! Round scheduling
//!
//! A round advance is one transaction over the whole registry: every
//! combatant is replenished and has its overexertion gate reopened before the
//! call returns, and exactly one history entry announces the new round.

use serde::Serialize;

use crate::combatant::CombatantRegistry;
use crate::core::config::RulesConfig;
use crate::core::types::Round;
use crate::history::{EntryKind, HistoryLog};
use crate::initiative::InitiativeLedger;

/// Summary of one round advance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round: Round,
    pub replenished: usize,
    pub hasted: usize,
}

/// Owns the round counter; nothing else increments it
#[derive(Debug, Clone)]
pub struct RoundScheduler {
    round: Round,
}

impl Default for RoundScheduler {
    fn default() -> Self {
        Self { round: 1 }
    }
}

impl RoundScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn advance(
        &mut self,
        registry: &mut CombatantRegistry,
        rules: &RulesConfig,
        log: &mut HistoryLog,
    ) -> RoundSummary {
        let ledger = InitiativeLedger::new(rules);
        let mut replenished = 0;
        let mut hasted = 0;

        for combatant in registry.iter_mut() {
            let hasted_now = combatant.has_haste();
            ledger.gain(combatant, rules.round_gain_for(hasted_now));
            combatant.status_mut().refresh_for_round();
            replenished += 1;
            if hasted_now {
                hasted += 1;
            }
        }

        self.round += 1;
        log.append(
            EntryKind::RoundStart,
            format!(
                "-- Round {} begins! All combatants ready up (+{} initiative) --",
                self.round, rules.round_gain
            ),
        );
        tracing::info!(round = self.round, replenished, hasted, "Round advanced");

        RoundSummary {
            round: self.round,
            replenished,
            hasted,
        }
    }

    pub fn reset(&mut self) {
        self.round = 1;
    }
}
