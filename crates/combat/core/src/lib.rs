//! Deterministic rules for gauge-driven party combat.
//!
//! `combat-core` decides when each combatant acts (action gauges), what an
//! action does when it resolves (damage, healing, statuses, guarding) and how
//! an operator picks actions and targets (command menu + targeting machine).
//! All mutation flows through [`battle::Battle`], which owns every component
//! and reports presentation-facing changes as [`event::CombatEvent`]s.
pub mod action;
pub mod battle;
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod policy;
pub mod rng;
pub mod scheduler;
pub mod state;
pub mod status;

pub use action::{
    ActionKind, ActionProfile, ActionReport, Effect, EffectPhase, ExecutionPipeline, HitCount,
    HitReport, PipelineContext, PipelineStep, RejectReason, ResolvedAction, TargetPolicy,
    TargetSelection,
};
pub use battle::{
    Battle, BattleBuilder, BattlePhase, CombatOutcome, CommandOutcome, FinalVitals,
};
pub use config::{AtbMode, CombatConfig};
pub use error::{CombatError, ErrorSeverity};
pub use event::{CombatEvent, EventSink, NullSink};
pub use input::{
    CommandMenu, InputCommand, MenuEntry, MenuOutcome, MenuPage, TargetingMachine,
    TargetingOutcome,
};
pub use policy::{EnemyIntent, EnemyPolicy, FirstTargetPolicy, RandomTargetPolicy};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use scheduler::{ActionScheduler, SchedulerError};
pub use state::{
    ActionGauge, Combatant, CombatantId, CombatantTemplate, Item, ItemCategory, ItemPool,
    ResourceMeter, Roster, Side, Skill, SpeedBoost, StateError,
};
pub use status::{
    AppliedStatus, GuardError, ModifiedStat, StatusEffects, StatusEngine, StatusKind,
    StatusOutcome, StatusTuning,
};
