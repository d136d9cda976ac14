//! Command execution - applies parsed shell commands to a tracker
//!
//! The session holds what belongs to the shell rather than the engine: the
//! selected combatant and the confirmation gate in front of `reset`.

use crate::combatant::Combatant;
use crate::command::parser::{Command, Target};
use crate::command::resolver::TargetResolver;
use crate::core::error::TrackerError;
use crate::core::types::CombatantId;
use crate::tracker::Tracker;

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this line, then the tracker
    Updated(String),
    /// Print this line only; nothing changed
    Rejected(String),
    ShowStatus,
    ShowHistory,
    ShowJson,
    ShowHelp,
    /// Ask the user before calling `Session::reset_confirmed`
    ConfirmReset,
    Quit,
}

pub struct Session {
    tracker: Tracker,
    selected: Option<CombatantId>,
}

impl Session {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            selected: None,
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn selected(&self) -> Option<CombatantId> {
        self.selected
    }

    /// Remove a combatant, dropping the selection if it pointed there
    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        let removed = self.tracker.remove_combatant(id);
        if removed.is_some() && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Runs after the user has confirmed a reset
    pub fn reset_confirmed(&mut self) {
        self.tracker.reset();
        self.selected = None;
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        match self.apply(command) {
            Ok(outcome) => outcome,
            Err(message) => Outcome::Rejected(message),
        }
    }

    fn resolve(&self, target: &Target) -> Result<CombatantId, String> {
        TargetResolver::new(&self.tracker, self.selected).resolve(target)
    }

    fn name_of(&self, id: CombatantId) -> String {
        self.tracker
            .combatant(id)
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }

    fn apply(&mut self, command: Command) -> Result<Outcome, String> {
        let outcome = match command {
            Command::Add {
                name,
                dexterity,
                modifier,
                is_pc,
            } => {
                let mut draft = self.tracker.draft().name(name).pc(is_pc);
                if let Some(dexterity) = dexterity {
                    draft.set_dexterity(dexterity);
                }
                if let Some(modifier) = modifier {
                    draft.set_modifier(modifier);
                }
                let id = self.tracker.add_combatant(draft).map_err(rejection)?;
                let added = self.tracker.combatant(id).ok_or("Combatant vanished")?;
                Outcome::Updated(format!(
                    "Added {} (DEX {}, {})",
                    added.name(),
                    added.dexterity(),
                    added.signed_modifier()
                ))
            }
            Command::Roll(who) => {
                let id = self.resolve(&who)?;
                self.tracker.roll_initiative(id).map_err(rejection)?;
                Outcome::Updated(self.last_entry())
            }
            Command::RollAll => {
                let rolled = self.tracker.roll_all();
                Outcome::Updated(format!("Rolled initiative for {} combatants", rolled.len()))
            }
            Command::Act { who, cost } => {
                let id = self.resolve(&who)?;
                self.tracker.take_action(id, cost).map_err(rejection)?;
                Outcome::Updated(self.last_entry())
            }
            Command::Interrupt => {
                if self.tracker.toggle_interrupt_mode() {
                    Outcome::Updated(format!(
                        "Interrupt mode ON (+{})",
                        self.tracker.rules().interrupt_surcharge
                    ))
                } else {
                    Outcome::Updated("Interrupt mode off".into())
                }
            }
            Command::Adjust { who, delta } => {
                let id = self.resolve(&who)?;
                self.tracker.adjust_initiative(id, delta).map_err(rejection)?;
                Outcome::Updated(self.last_entry())
            }
            Command::Overexert(who) => {
                let id = self.resolve(&who)?;
                self.tracker.overexert(id).map_err(rejection)?;
                Outcome::Updated(self.last_entry())
            }
            Command::Haste(who) => {
                let id = self.resolve(&who)?;
                let hasted = self.tracker.toggle_haste(id).map_err(rejection)?;
                Outcome::Updated(format!(
                    "{} {} haste",
                    self.name_of(id),
                    if hasted { "gains" } else { "loses" }
                ))
            }
            Command::Exhaustion { who, delta } => {
                let id = self.resolve(&who)?;
                let level = self.tracker.adjust_exhaustion(id, delta).map_err(rejection)?;
                Outcome::Updated(format!("{} exhaustion: {}", self.name_of(id), level))
            }
            Command::Notes { who, text } => {
                let id = self.resolve(&who)?;
                self.tracker.update_notes(id, text);
                Outcome::Updated(format!("Updated notes for {}", self.name_of(id)))
            }
            Command::Remove(who) => {
                let id = self.resolve(&who)?;
                let removed = self.remove(id).ok_or("Combatant already removed")?;
                Outcome::Updated(format!("Removed {}", removed.name()))
            }
            Command::Select(who) => {
                let id = self.resolve(&who)?;
                self.selected = Some(id);
                Outcome::Updated(format!("Selected {}", self.name_of(id)))
            }
            Command::Deselect => {
                self.selected = None;
                Outcome::Updated("Selection cleared".into())
            }
            Command::Round => {
                self.tracker.new_round();
                Outcome::Updated(self.last_entry())
            }
            Command::Clear => {
                self.tracker.clear_history();
                Outcome::Updated("History cleared".into())
            }
            Command::Reset => Outcome::ConfirmReset,
            Command::History => Outcome::ShowHistory,
            Command::Status => Outcome::ShowStatus,
            Command::Json => Outcome::ShowJson,
            Command::Help => Outcome::ShowHelp,
            Command::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }

    fn last_entry(&self) -> String {
        self.tracker
            .history()
            .last()
            .map(|e| e.text().to_string())
            .unwrap_or_default()
    }
}

fn rejection(err: TrackerError) -> String {
    err.to_string()
}
