//! Action costs: presets, custom costs and the interrupt surcharge
//!
//! Costs are ADDITIVE. Interrupting adds a flat surcharge; nothing scales.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::config::RulesConfig;
use crate::core::error::{Result, TrackerError};

/// Named costs offered by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionPreset {
    Action,
    BonusAction,
    Reaction,
    Dodge,
    Interact,
    // Movement
    Step,
    HalfSpeed,
    FullSpeed,
    DoubleSpeed,
    // Extra attack: cost per swing
    StandardAttack,
    TwoAttacks,
    ThreeAttacks,
    FourAttacks,
}

impl ActionPreset {
    pub fn all() -> &'static [ActionPreset] {
        &[
            ActionPreset::Action,
            ActionPreset::BonusAction,
            ActionPreset::Reaction,
            ActionPreset::Dodge,
            ActionPreset::Interact,
            ActionPreset::Step,
            ActionPreset::HalfSpeed,
            ActionPreset::FullSpeed,
            ActionPreset::DoubleSpeed,
            ActionPreset::StandardAttack,
            ActionPreset::TwoAttacks,
            ActionPreset::ThreeAttacks,
            ActionPreset::FourAttacks,
        ]
    }

    /// Cost before any interrupt surcharge
    pub fn nominal_cost(&self) -> u32 {
        match self {
            ActionPreset::Action => 6,
            ActionPreset::BonusAction => 3,
            ActionPreset::Reaction => 3,
            ActionPreset::Dodge => 3,
            ActionPreset::Interact => 2,

            ActionPreset::Step => 1,
            ActionPreset::HalfSpeed => 2,
            ActionPreset::FullSpeed => 3,
            ActionPreset::DoubleSpeed => 6,

            ActionPreset::StandardAttack => 6,
            ActionPreset::TwoAttacks => 3,
            ActionPreset::ThreeAttacks => 2,
            ActionPreset::FourAttacks => 1,
        }
    }

    /// Reaction and Dodge never pay the interrupt surcharge
    pub fn interrupt_exempt(&self) -> bool {
        matches!(self, ActionPreset::Reaction | ActionPreset::Dodge)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionPreset::Action => "Action",
            ActionPreset::BonusAction => "Bonus Action",
            ActionPreset::Reaction => "Reaction",
            ActionPreset::Dodge => "Dodge",
            ActionPreset::Interact => "Interact",
            ActionPreset::Step => "5ft",
            ActionPreset::HalfSpeed => "Half Speed",
            ActionPreset::FullSpeed => "Full Speed",
            ActionPreset::DoubleSpeed => "Double Speed",
            ActionPreset::StandardAttack => "Standard Attack",
            ActionPreset::TwoAttacks => "2 Attacks (each)",
            ActionPreset::ThreeAttacks => "3 Attacks (each)",
            ActionPreset::FourAttacks => "4 Attacks (each)",
        }
    }

    /// Short name accepted by `FromStr`
    pub fn short_name(&self) -> &'static str {
        match self {
            ActionPreset::Action => "action",
            ActionPreset::BonusAction => "bonus",
            ActionPreset::Reaction => "reaction",
            ActionPreset::Dodge => "dodge",
            ActionPreset::Interact => "interact",
            ActionPreset::Step => "5ft",
            ActionPreset::HalfSpeed => "half",
            ActionPreset::FullSpeed => "full",
            ActionPreset::DoubleSpeed => "double",
            ActionPreset::StandardAttack => "attack",
            ActionPreset::TwoAttacks => "attack2",
            ActionPreset::ThreeAttacks => "attack3",
            ActionPreset::FourAttacks => "attack4",
        }
    }
}

impl fmt::Display for ActionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActionPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let alias = match wanted.as_str() {
            "bonus-action" | "bonus_action" => "bonus",
            "step" => "5ft",
            "attack1" => "attack",
            other => other,
        };
        ActionPreset::all()
            .iter()
            .copied()
            .find(|p| p.short_name() == alias)
            .ok_or_else(|| format!("unknown action '{}'", s.trim()))
    }
}

/// What a combatant is trying to pay for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionCost {
    Preset(ActionPreset),
    /// Free-form cost in `1..=initiative_max`, always subject to the surcharge
    Custom(u32),
}

impl ActionCost {
    /// Validate a raw custom cost against the configured ceiling. Zero,
    /// negative and oversized costs are rejected so that they can never reach
    /// the ledger.
    pub fn custom(raw: i64, max: u32) -> Result<Self> {
        if !(1..=i64::from(max)).contains(&raw) {
            return Err(TrackerError::InvalidCost(raw));
        }
        Ok(ActionCost::Custom(raw as u32))
    }

    pub fn nominal(&self) -> u32 {
        match self {
            ActionCost::Preset(preset) => preset.nominal_cost(),
            ActionCost::Custom(cost) => *cost,
        }
    }

    pub fn interrupt_exempt(&self) -> bool {
        match self {
            ActionCost::Preset(preset) => preset.interrupt_exempt(),
            ActionCost::Custom(_) => false,
        }
    }
}

impl From<ActionPreset> for ActionCost {
    fn from(preset: ActionPreset) -> Self {
        ActionCost::Preset(preset)
    }
}

impl FromStr for ActionCost {
    type Err = String;

    /// Either a preset short name or a positive number. The upper bound
    /// depends on the rules, so the tracker checks it when the cost is paid.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(raw) = s.trim().parse::<i64>() {
            return ActionCost::custom(raw, u32::MAX).map_err(|e| e.to_string());
        }
        s.parse::<ActionPreset>().map(ActionCost::Preset)
    }
}

/// Turns a nominal cost into the cost actually charged
///
/// A pure function of its arguments: interrupt mode is passed in, never read
/// from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCostCalculator {
    surcharge: u32,
}

impl Default for ActionCostCalculator {
    fn default() -> Self {
        Self::from_rules(&RulesConfig::default())
    }
}

impl ActionCostCalculator {
    pub fn from_rules(rules: &RulesConfig) -> Self {
        Self {
            surcharge: rules.interrupt_surcharge,
        }
    }

    pub fn final_cost(&self, nominal: u32, interrupt_mode: bool, skip_interrupt_check: bool) -> u32 {
        if skip_interrupt_check || !interrupt_mode {
            nominal
        } else {
            nominal.saturating_add(self.surcharge)
        }
    }

    pub fn cost_of(&self, cost: ActionCost, interrupt_mode: bool) -> u32 {
        self.final_cost(cost.nominal(), interrupt_mode, cost.interrupt_exempt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_surcharge() {
        let calc = ActionCostCalculator::default();
        assert_eq!(calc.final_cost(6, true, false), 8);
        assert_eq!(calc.final_cost(6, false, false), 6);
    }

    #[test]
    fn test_exempt_actions_skip_surcharge() {
        let calc = ActionCostCalculator::default();
        assert_eq!(calc.final_cost(3, true, true), 3);
        assert_eq!(calc.cost_of(ActionPreset::Reaction.into(), true), 3);
        assert_eq!(calc.cost_of(ActionPreset::Dodge.into(), true), 3);
        assert_eq!(calc.cost_of(ActionPreset::BonusAction.into(), true), 5);
    }

    #[test]
    fn test_only_reaction_and_dodge_exempt() {
        let exempt: Vec<_> = ActionPreset::all()
            .iter()
            .filter(|p| p.interrupt_exempt())
            .collect();
        assert_eq!(exempt, vec![&ActionPreset::Reaction, &ActionPreset::Dodge]);
    }

    #[test]
    fn test_preset_costs() {
        assert_eq!(ActionPreset::Action.nominal_cost(), 6);
        assert_eq!(ActionPreset::Interact.nominal_cost(), 2);
        let movement: Vec<u32> = [
            ActionPreset::Step,
            ActionPreset::HalfSpeed,
            ActionPreset::FullSpeed,
            ActionPreset::DoubleSpeed,
        ]
        .iter()
        .map(|p| p.nominal_cost())
        .collect();
        assert_eq!(movement, vec![1, 2, 3, 6]);
        let attacks: Vec<u32> = [
            ActionPreset::StandardAttack,
            ActionPreset::TwoAttacks,
            ActionPreset::ThreeAttacks,
            ActionPreset::FourAttacks,
        ]
        .iter()
        .map(|p| p.nominal_cost())
        .collect();
        assert_eq!(attacks, vec![6, 3, 2, 1]);
    }

    #[test]
    fn test_custom_cost_bounds() {
        assert!(matches!(ActionCost::custom(0, 25), Err(TrackerError::InvalidCost(0))));
        assert!(matches!(ActionCost::custom(-3, 25), Err(TrackerError::InvalidCost(-3))));
        assert!(matches!(ActionCost::custom(26, 25), Err(TrackerError::InvalidCost(26))));
        assert_eq!(ActionCost::custom(1, 25).unwrap().nominal(), 1);
        assert_eq!(ActionCost::custom(25, 25).unwrap().nominal(), 25);
        assert!(!ActionCost::custom(4, 25).unwrap().interrupt_exempt());
    }

    #[test]
    fn test_custom_cost_follows_configured_max() {
        assert_eq!(ActionCost::custom(28, 30).unwrap().nominal(), 28);
        assert!(matches!(ActionCost::custom(31, 30), Err(TrackerError::InvalidCost(31))));
    }

    #[test]
    fn test_parse_costs() {
        assert_eq!("bonus".parse::<ActionPreset>(), Ok(ActionPreset::BonusAction));
        assert_eq!("Dodge".parse::<ActionPreset>(), Ok(ActionPreset::Dodge));
        assert_eq!("step".parse::<ActionPreset>(), Ok(ActionPreset::Step));
        assert!("fireball".parse::<ActionPreset>().is_err());

        assert_eq!("7".parse::<ActionCost>(), Ok(ActionCost::Custom(7)));
        assert_eq!(
            "attack3".parse::<ActionCost>(),
            Ok(ActionCost::Preset(ActionPreset::ThreeAttacks))
        );
        assert!("0".parse::<ActionCost>().is_err());
        assert_eq!("28".parse::<ActionCost>(), Ok(ActionCost::Custom(28)));
    }

    #[test]
    fn test_short_names_round_trip() {
        for preset in ActionPreset::all() {
            assert_eq!(preset.short_name().parse::<ActionPreset>(), Ok(*preset));
        }
    }
}
