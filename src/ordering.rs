//! Turn order: a projection of the registry, never stored
//!
//! Highest unspent initiative first, then highest dexterity. Equal keys keep
//! registry (insertion) order because the sort is stable.

use std::cmp::Reverse;

use crate::combatant::Combatant;

pub fn turn_order(combatants: &[Combatant]) -> Vec<&Combatant> {
    let mut ordered: Vec<&Combatant> = combatants.iter().collect();
    ordered.sort_by_key(|c| (Reverse(c.initiative()), Reverse(c.dexterity())));
    ordered
}

/// Whoever holds the most unspent initiative
pub fn next_actor(combatants: &[Combatant]) -> Option<&Combatant> {
    turn_order(combatants).into_iter().next()
}
