use crate::error::{CombatError, ErrorSeverity};

/// Why an action was refused before anything was spent.
///
/// A rejected action consumes neither resources nor the turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    #[error("not enough sanity")]
    InsufficientSanity,

    #[error("item is not in the inventory")]
    ItemUnavailable,

    #[error("key items cannot be used in combat")]
    KeyItem,

    #[error("no valid target")]
    NoValidTarget,

    #[error("combatant does not know that skill")]
    UnknownSkill,

    #[error("combatant cannot act right now")]
    ActorUnavailable,
}

impl CombatError for RejectReason {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActorUnavailable => ErrorSeverity::Internal,
            Self::UnknownSkill => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientSanity => "ACTION_INSUFFICIENT_SANITY",
            Self::ItemUnavailable => "ACTION_ITEM_UNAVAILABLE",
            Self::KeyItem => "ACTION_KEY_ITEM",
            Self::NoValidTarget => "ACTION_NO_VALID_TARGET",
            Self::UnknownSkill => "ACTION_UNKNOWN_SKILL",
            Self::ActorUnavailable => "ACTION_ACTOR_UNAVAILABLE",
        }
    }
}
