//! Rules configuration with documented constants
//!
//! All initiative-economy numbers are collected here. The defaults are the
//! ready-up house rules; a TOML file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, TrackerError};

/// Initiative ceiling. Also the value a natural 20 snaps to.
pub const INITIATIVE_MAX: u32 = 25;

/// Numeric rules of the initiative economy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Upper bound of every combatant's initiative
    ///
    /// Nothing can push initiative past this value: rolls, round gains,
    /// overexertion and manual nudges all clamp to it.
    pub initiative_max: u32,

    /// Faces on the initiative die
    ///
    /// Rolling the top face is a critical: initiative snaps to
    /// `initiative_max` regardless of modifier.
    pub die_sides: u32,

    /// Initiative gained by every combatant when a round begins
    pub round_gain: u32,

    /// Multiplier applied to `round_gain` for hasted combatants
    ///
    /// Haste affects replenishment only, never action costs.
    pub haste_multiplier: u32,

    /// Initiative gained by overexerting (once per round)
    pub overexert_gain: u32,

    /// Exhaustion levels taken by overexerting
    pub overexert_exhaustion: u32,

    /// Extra cost charged for acting in interrupt mode
    ///
    /// Reaction and Dodge are exempt.
    pub interrupt_surcharge: u32,

    /// Dexterity a new combatant draft starts with
    pub default_dexterity: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initiative_max: INITIATIVE_MAX,
            die_sides: 20,
            round_gain: 8,
            haste_multiplier: 2,
            overexert_gain: 8,
            overexert_exhaustion: 1,
            interrupt_surcharge: 2,
            default_dexterity: 10,
        }
    }
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-round gain for a combatant, accounting for haste
    pub fn round_gain_for(&self, hasted: bool) -> u32 {
        if hasted {
            self.round_gain.saturating_mul(self.haste_multiplier)
        } else {
            self.round_gain
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.initiative_max == 0 {
            return Err("initiative_max must be at least 1".into());
        }

        if self.die_sides < 2 {
            return Err(format!("die_sides ({}) must be at least 2", self.die_sides));
        }

        if self.haste_multiplier == 0 {
            return Err("haste_multiplier must be at least 1".into());
        }

        if self.round_gain > self.initiative_max {
            return Err(format!(
                "round_gain ({}) should be <= initiative_max ({})",
                self.round_gain, self.initiative_max
            ));
        }

        Ok(())
    }
}

/// Parse rules from TOML text; missing keys fall back to the defaults
pub fn parse_rules(content: &str) -> Result<RulesConfig> {
    let rules: RulesConfig = toml::from_str(content)?;
    rules.validate().map_err(TrackerError::InvalidRules)?;
    Ok(rules)
}

/// Load rules from a TOML file
pub fn load_rules(path: &Path) -> Result<RulesConfig> {
    let content = fs::read_to_string(path)?;
    let rules = parse_rules(&content)?;
    tracing::info!(path = %path.display(), "Loaded rules");
    Ok(rules)
}
