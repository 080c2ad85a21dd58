use crate::error::{CombatError, ErrorSeverity};
use crate::state::CombatantId;

/// Reasons a guard relationship cannot be formed.
///
/// Only one level of redirection exists: a guardian may not itself be
/// guarded, and a ward may not itself be guarding someone.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GuardError {
    #[error("combatant {0} cannot guard itself")]
    SelfGuard(CombatantId),

    #[error("combatant {0} does not exist")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is dead")]
    Dead(CombatantId),

    #[error("combatant {0} cannot guard an opponent")]
    OpposingSides(CombatantId),

    #[error("guardian {guardian} is itself guarded by {by}")]
    GuardianIsGuarded {
        guardian: CombatantId,
        by: CombatantId,
    },

    #[error("ward {ward} is already guarding {protecting}")]
    WardIsGuarding {
        ward: CombatantId,
        protecting: CombatantId,
    },
}

impl CombatError for GuardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCombatant(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SelfGuard(_) => "GUARD_SELF",
            Self::UnknownCombatant(_) => "GUARD_UNKNOWN_COMBATANT",
            Self::Dead(_) => "GUARD_DEAD",
            Self::OpposingSides(_) => "GUARD_OPPOSING_SIDES",
            Self::GuardianIsGuarded { .. } => "GUARD_GUARDIAN_IS_GUARDED",
            Self::WardIsGuarding { .. } => "GUARD_WARD_IS_GUARDING",
        }
    }
}
