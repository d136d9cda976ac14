//! Combat history log
//!
//! Append-only: entries are never edited, reordered or pruned. The only way
//! to drop entries is `clear`, which empties the whole log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of state change produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Roll,
    Action,
    Adjustment,
    Overexertion,
    RoundStart,
}

/// One immutable line of history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    kind: EntryKind,
    text: String,
}

impl HistoryEntry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Round boundaries are highlighted by renderers; they carry no logic
    pub fn is_round_boundary(&self) -> bool {
        self.kind == EntryKind::RoundStart
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The complete history log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, kind: EntryKind, text: impl Into<String>) {
        self.entries.push(HistoryEntry::new(kind, text));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn entries_of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}
