//! Initiative economy: the ledger that moves initiative and the calculator
//! that prices actions

pub mod cost;
pub mod ledger;

pub use cost::{ActionCost, ActionCostCalculator, ActionPreset};
pub use ledger::{InitiativeChange, InitiativeLedger, InitiativeRoll, SpendReceipt};
