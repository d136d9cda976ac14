pub mod config;
pub mod error;
pub mod types;

pub use config::{load_rules, parse_rules, RulesConfig, INITIATIVE_MAX};
pub use error::{Result, TrackerError};
pub use types::{CombatantId, Round};
