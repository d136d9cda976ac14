//! Target resolution - turns a typed `<who>` into a concrete combatant id

use crate::command::parser::Target;
use crate::core::types::CombatantId;
use crate::tracker::Tracker;

/// Resolves targets against the tracker's current turn order
pub struct TargetResolver<'a> {
    tracker: &'a Tracker,
    selected: Option<CombatantId>,
}

impl<'a> TargetResolver<'a> {
    pub fn new(tracker: &'a Tracker, selected: Option<CombatantId>) -> Self {
        Self { tracker, selected }
    }

    pub fn resolve(&self, target: &Target) -> Result<CombatantId, String> {
        match target {
            Target::Selected => self
                .selected
                .filter(|id| self.tracker.combatant(*id).is_some())
                .ok_or_else(|| "No combatant selected".to_string()),
            Target::Position(position) => {
                let order = self.tracker.turn_order();
                position
                    .checked_sub(1)
                    .and_then(|index| order.get(index))
                    .map(|c| c.id())
                    .ok_or_else(|| format!("No combatant at position {}", position))
            }
            Target::Name(name) => self
                .tracker
                .registry()
                .find_by_name(name)
                .map(|c| c.id())
                .ok_or_else(|| format!("No combatant named '{}'", name)),
        }
    }
}
