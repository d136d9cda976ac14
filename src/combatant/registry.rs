//! Ordered collection of combatants
//!
//! Insertion order is kept: it is the tie-breaker of last resort for turn
//! order. Lookups are linear; encounters hold a handful of combatants.

use crate::combatant::{Combatant, CombatantDraft};
use crate::core::error::{Result, TrackerError};
use crate::core::types::CombatantId;

#[derive(Debug, Clone, Default)]
pub struct CombatantRegistry {
    combatants: Vec<Combatant>,
}

impl CombatantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant from a draft, assigning a fresh id
    ///
    /// Rejects a blank name without touching the registry.
    pub fn add(&mut self, draft: CombatantDraft) -> Result<&Combatant> {
        if !draft.is_submittable() {
            return Err(TrackerError::EmptyName);
        }

        let trimmed = draft.current_name().trim().to_string();
        let draft = draft.name(trimmed);
        let combatant = Combatant::from_draft(CombatantId::new(), draft);
        tracing::debug!(
            combatant = %combatant.name(),
            dexterity = combatant.dexterity(),
            modifier = combatant.modifier(),
            "Added combatant"
        );

        self.combatants.push(combatant);
        let index = self.combatants.len() - 1;
        Ok(&self.combatants[index])
    }

    /// Remove a combatant; absence is not an error
    pub fn remove(&mut self, id: CombatantId) -> Option<Combatant> {
        let pos = self.combatants.iter().position(|c| c.id() == id)?;
        let removed = self.combatants.remove(pos);
        tracing::debug!(combatant = %removed.name(), "Removed combatant");
        Some(removed)
    }

    pub fn find(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id() == id)
    }

    /// Like `find_mut`, but absence becomes a `CombatantNotFound` rejection
    pub(crate) fn require_mut(&mut self, id: CombatantId) -> Result<&mut Combatant> {
        self.find_mut(id).ok_or(TrackerError::CombatantNotFound(id))
    }

    /// Find by name, ignoring case; first match in insertion order wins
    pub fn find_by_name(&self, name: &str) -> Option<&Combatant> {
        let wanted = name.trim().to_lowercase();
        self.combatants
            .iter()
            .find(|c| c.name().to_lowercase() == wanted)
    }

    /// Replace a combatant's notes. Returns false if the id is unknown.
    pub fn update_notes(&mut self, id: CombatantId, notes: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(combatant) => {
                combatant.set_notes(notes.into());
                true
            }
            None => false,
        }
    }

    /// Combatants in insertion order (not turn order)
    pub fn as_slice(&self) -> &[Combatant] {
        &self.combatants
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn ids(&self) -> Vec<CombatantId> {
        self.combatants.iter().map(|c| c.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn clear(&mut self) {
        self.combatants.clear();
    }
}
