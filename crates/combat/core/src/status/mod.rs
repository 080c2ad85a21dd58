//! Named, timed status effects and the engine that owns their rules.
//!
//! Statuses are stored on each [`Combatant`](crate::state::Combatant); the
//! [`StatusEngine`] is the only code that adds or removes them and the only
//! writer of the derived attack/defense/speed factors.

mod effects;
mod engine;
mod error;
mod kind;

pub use effects::{AppliedStatus, StatusEffects};
pub use engine::{StatusEngine, StatusOutcome, StatusTuning};
pub use error::GuardError;
pub use kind::{ModifiedStat, StatusKind};
