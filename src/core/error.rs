use thiserror::Error;

use crate::core::types::CombatantId;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Combatant name must not be empty")]
    EmptyName,

    #[error("Invalid action cost: {0}")]
    InvalidCost(i64),

    #[error("{name} needs {needed} initiative but only has {available}")]
    InsufficientInitiative {
        name: String,
        needed: u32,
        available: u32,
    },

    #[error("{0} has already overexerted this round")]
    AlreadyOverexerted(String),

    #[error("Combatant not found: {0}")]
    CombatantNotFound(CombatantId),

    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Rules parse error: {0}")]
    RulesParseError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl TrackerError {
    /// True for the expected, non-exceptional outcomes: bad input, a rule
    /// refusing the operation, or a combatant that is no longer present.
    /// None of these mutate state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TrackerError::EmptyName
                | TrackerError::InvalidCost(_)
                | TrackerError::InsufficientInitiative { .. }
                | TrackerError::AlreadyOverexerted(_)
                | TrackerError::CombatantNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
