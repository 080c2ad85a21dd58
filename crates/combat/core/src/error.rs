//! Common error infrastructure for combat-core.
//!
//! Domain errors (`StateError`, `GuardError`, `SchedulerError`) live next to
//! the components that raise them. This module only holds the shared
//! classification every one of them implements.
//!
//! Normal combat never fails: rejected actions and ignored commands are
//! ordinary outcomes, not errors. The error types here describe collaborator
//! misuse (scheduling a dead combatant, unknown ids, malformed rosters).

/// Severity level of an error, used for logging and recovery decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The caller can retry with a different choice.
    ///
    /// Examples: guard cycle, target already guarded
    Recoverable,

    /// Invalid input that should be fixed by the caller.
    ///
    /// Examples: duplicate skill name, empty roster side
    Validation,

    /// Collaborator misuse that indicates a bug.
    ///
    /// Examples: activating a dead combatant, unknown combatant id
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
///
/// - Derive `thiserror::Error` for Display/Error
/// - Classify severity by recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the variant, for logs and tests.
    fn error_code(&self) -> &'static str;
}
