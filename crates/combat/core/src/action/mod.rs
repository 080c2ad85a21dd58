//! Actions: what a combatant can do, who it may target and how it resolves.
//!
//! - [`ActionKind`] names the operator's choice (attack, guard, skill, item)
//! - [`ActionProfile`] resolves a choice into cost, targeting and effects
//! - [`TargetPolicy`] enumerates legal targets
//! - [`ExecutionPipeline`] validates, announces and applies a resolved action
mod damage;
mod effect;
mod error;
mod kind;
mod pipeline;
mod targeting;

pub use damage::{HitReport, resolve_hit};
pub use effect::{Effect, EffectPhase, HitCount};
pub use error::RejectReason;
pub use kind::{ActionKind, ActionProfile};
pub use pipeline::{ActionReport, ExecutionPipeline, PipelineContext, PipelineStep};
pub use targeting::{ResolvedAction, TargetPolicy, TargetSelection};
