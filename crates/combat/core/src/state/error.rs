//! Roster and inventory errors.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::{CombatantId, Side};

/// Errors raised while building or mutating combat state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("combatant '{combatant}' already knows a skill named '{skill}'")]
    DuplicateSkill { combatant: String, skill: String },

    #[error("combatant '{combatant}' has an invalid maximum {resource}")]
    InvalidMaximum {
        combatant: String,
        resource: &'static str,
    },

    #[error("combatant '{combatant}' has an invalid action speed")]
    InvalidSpeed { combatant: String },

    #[error("roster has no {side} combatants")]
    EmptySide { side: Side },

    #[error("roster is full ({side}: max {max})")]
    RosterFull { side: Side, max: usize },

    #[error("combatant {0} does not exist")]
    UnknownCombatant(CombatantId),

    #[error("item '{0}' is not in the pool")]
    UnknownItem(String),

    #[error("item '{0}' has no uses left")]
    ItemDepleted(String),
}

impl CombatError for StateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateSkill { .. }
            | Self::InvalidMaximum { .. }
            | Self::InvalidSpeed { .. }
            | Self::EmptySide { .. }
            | Self::RosterFull { .. } => ErrorSeverity::Validation,
            Self::ItemDepleted(_) => ErrorSeverity::Recoverable,
            Self::UnknownCombatant(_) | Self::UnknownItem(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateSkill { .. } => "STATE_DUPLICATE_SKILL",
            Self::InvalidMaximum { .. } => "STATE_INVALID_MAXIMUM",
            Self::InvalidSpeed { .. } => "STATE_INVALID_SPEED",
            Self::EmptySide { .. } => "STATE_EMPTY_SIDE",
            Self::RosterFull { .. } => "STATE_ROSTER_FULL",
            Self::UnknownCombatant(_) => "STATE_UNKNOWN_COMBATANT",
            Self::UnknownItem(_) => "STATE_UNKNOWN_ITEM",
            Self::ItemDepleted(_) => "STATE_ITEM_DEPLETED",
        }
    }
}
