//! Action execution: validate, announce, wait, apply, end the turn.
//!
//! The announce wait is an explicit state. [`ExecutionPipeline::advance`]
//! consumes elapsed time and applies the action once the delay is spent.
//! Once announced, an action always completes.
//!
//! ## Effect order
//!
//! 1. Vital effects (damage, heal, sanity) in declaration order
//! 2. Status effects (statuses, guard, speed) in declaration order
//! 3. Costs (sanity, item)
//!
//! Deaths are settled the moment they happen so later hits skip the dead.

use tracing::{debug, info, warn};

use crate::action::{
    ActionKind, ActionProfile, Effect, HitReport, RejectReason, ResolvedAction, TargetSelection,
    resolve_hit,
};
use crate::config::CombatConfig;
use crate::event::{CombatEvent, EventSink};
use crate::rng::{RngOracle, compute_seed};
use crate::scheduler::ActionScheduler;
use crate::state::{CombatantId, ItemPool, Roster};
use crate::status::StatusEngine;

/// Mutable battle state the pipeline works on.
pub struct PipelineContext<'a> {
    pub roster: &'a mut Roster,
    pub items: &'a mut ItemPool,
    pub status: &'a StatusEngine,
    pub scheduler: &'a mut ActionScheduler,
    pub config: &'a CombatConfig,
    pub rng: &'a dyn RngOracle,
    pub seed: u64,
}

/// Summary of a completed action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionReport {
    pub actor: CombatantId,
    pub kind: ActionKind,
    pub name: String,
    pub hits: Vec<HitReport>,
    /// Combatants whose death was processed during this action.
    pub deaths: Vec<CombatantId>,
    /// Selected targets that were already dead when effects applied.
    pub skipped: Vec<CombatantId>,
}

/// Result of [`ExecutionPipeline::advance`].
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineStep {
    Idle,
    Waiting { remaining: f32 },
    Completed(ActionReport),
}

#[derive(Clone, Debug)]
struct PendingAction {
    action: ResolvedAction,
    profile: ActionProfile,
    remaining: f32,
    nonce: u64,
}

#[derive(Clone, Debug, Default)]
enum PipelineState {
    #[default]
    Idle,
    Announcing(Box<PendingAction>),
}

/// Runs at most one action at a time.
#[derive(Clone, Debug, Default)]
pub struct ExecutionPipeline {
    state: PipelineState,
}

impl ExecutionPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, PipelineState::Announcing(_))
    }

    /// Actor of the action being announced, if any.
    pub fn pending_actor(&self) -> Option<CombatantId> {
        match &self.state {
            PipelineState::Announcing(pending) => Some(pending.action.actor),
            PipelineState::Idle => None,
        }
    }

    /// Validates `action` and announces it.
    ///
    /// On rejection nothing is spent, the turn is not consumed and
    /// `ActionRejected` is emitted.
    pub fn start(
        &mut self,
        action: ResolvedAction,
        nonce: u64,
        ctx: &mut PipelineContext<'_>,
        sink: &mut dyn EventSink,
    ) -> Result<(), RejectReason> {
        match self.validate(&action, ctx) {
            Ok((profile, action)) => {
                let actor_name = ctx
                    .roster
                    .get(action.actor)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                let text = profile.announcement(&actor_name);
                info!(
                    target: "combat::pipeline",
                    actor = %actor_name,
                    action = %profile.name,
                    "announce"
                );
                sink.emit(CombatEvent::Announce {
                    actor: action.actor,
                    text,
                });

                self.state = PipelineState::Announcing(Box::new(PendingAction {
                    action,
                    profile,
                    remaining: ctx.config.announce_delay.max(0.0),
                    nonce,
                }));
                Ok(())
            }
            Err(reason) => {
                warn!(
                    target: "combat::pipeline",
                    actor = %action.actor,
                    %reason,
                    "action rejected"
                );
                sink.emit(CombatEvent::ActionRejected {
                    actor: action.actor,
                    reason,
                });
                Err(reason)
            }
        }
    }

    fn validate(
        &self,
        action: &ResolvedAction,
        ctx: &PipelineContext<'_>,
    ) -> Result<(ActionProfile, ResolvedAction), RejectReason> {
        if self.is_busy() {
            return Err(RejectReason::ActorUnavailable);
        }
        let actor = ctx
            .roster
            .get(action.actor)
            .filter(|c| c.is_alive() && !c.is_inert())
            .ok_or(RejectReason::ActorUnavailable)?;

        let profile = ActionProfile::resolve(&action.kind, actor, ctx.items)?;
        if !actor.can_afford(profile.sanity_cost) {
            return Err(RejectReason::InsufficientSanity);
        }

        // Group policies always cover the whole living side; single
        // policies take exactly one legal id.
        let target = match profile.targeting.auto_selection(actor, ctx.roster) {
            Some(selection) => selection,
            None if profile.targeting.is_group() => return Err(RejectReason::NoValidTarget),
            None => {
                let legal = profile.targeting.candidates(actor, ctx.roster);
                match action.target.ids(action.actor).as_slice() {
                    [single] if legal.contains(single) => TargetSelection::Single(*single),
                    _ => return Err(RejectReason::NoValidTarget),
                }
            }
        };

        Ok((
            profile,
            ResolvedAction::new(action.actor, action.kind.clone(), target),
        ))
    }

    /// Consumes `delta` seconds of the announce wait.
    ///
    /// When the wait is over the action is applied and the actor's turn ends.
    pub fn advance(
        &mut self,
        delta: f32,
        ctx: &mut PipelineContext<'_>,
        sink: &mut dyn EventSink,
    ) -> PipelineStep {
        let PipelineState::Announcing(pending) = &mut self.state else {
            return PipelineStep::Idle;
        };

        pending.remaining -= delta.max(0.0);
        if pending.remaining > 0.0 {
            return PipelineStep::Waiting {
                remaining: pending.remaining,
            };
        }

        let PipelineState::Announcing(pending) = std::mem::take(&mut self.state) else {
            return PipelineStep::Idle;
        };
        let report = execute(*pending, ctx, sink);
        ctx.scheduler.end_turn(ctx.roster, ctx.status, sink);
        PipelineStep::Completed(report)
    }
}

fn execute(
    pending: PendingAction,
    ctx: &mut PipelineContext<'_>,
    sink: &mut dyn EventSink,
) -> ActionReport {
    let PendingAction {
        action,
        profile,
        nonce,
        ..
    } = pending;
    let actor = action.actor;

    let mut report = ActionReport {
        actor,
        kind: action.kind.clone(),
        name: profile.name.clone(),
        hits: Vec::new(),
        deaths: Vec::new(),
        skipped: Vec::new(),
    };

    let (targets, skipped): (Vec<_>, Vec<_>) = action
        .target
        .ids(actor)
        .into_iter()
        .partition(|&id| is_targetable(ctx.roster, id));
    if !skipped.is_empty() {
        debug!(target: "combat::pipeline", ?skipped, "targets died before resolution");
    }
    report.skipped = skipped;

    let attack_multiplier = ctx
        .roster
        .get(actor)
        .map_or(1.0, |c| c.attack_multiplier());

    let mut effects: Vec<(usize, &Effect)> = profile.effects.iter().enumerate().collect();
    effects.sort_by_key(|(_, effect)| effect.phase());

    for (index, effect) in effects {
        apply_effect(
            effect,
            index as u32,
            actor,
            &targets,
            attack_multiplier,
            nonce,
            ctx,
            sink,
            &mut report,
        );
    }

    pay_costs(&profile, actor, ctx, sink, &mut report);
    report
}

#[allow(clippy::too_many_arguments)]
fn apply_effect(
    effect: &Effect,
    index: u32,
    actor: CombatantId,
    targets: &[CombatantId],
    attack_multiplier: f32,
    nonce: u64,
    ctx: &mut PipelineContext<'_>,
    sink: &mut dyn EventSink,
    report: &mut ActionReport,
) {
    match effect {
        Effect::Damage { power, hits } => {
            let count = hits.roll(ctx.rng, compute_seed(ctx.seed, nonce, actor.0, index));
            for &target in targets {
                for _ in 0..count {
                    if !is_targetable(ctx.roster, target) {
                        break;
                    }
                    let Some(hit) = resolve_hit(
                        ctx.roster,
                        ctx.status,
                        ctx.config,
                        attack_multiplier,
                        *power,
                        target,
                        sink,
                    ) else {
                        break;
                    };
                    report.hits.push(hit);
                    if hit.died {
                        settle_death(ctx, hit.recipient, sink, report);
                    }
                }
            }
        }
        Effect::SanityDamage { power } => {
            for &target in living(ctx.roster, targets).iter() {
                let Some(c) = ctx.roster.get_mut(target) else {
                    continue;
                };
                c.lose_sanity(*power);
                if let Some(sanity) = c.sanity() {
                    sink.emit(CombatEvent::SanityChanged {
                        entity: target,
                        current: sanity.current,
                    });
                }
                if c.is_dead() {
                    settle_death(ctx, target, sink, report);
                }
            }
        }
        Effect::Heal { amount } => {
            for target in living(ctx.roster, targets) {
                if let Some(c) = ctx.roster.get_mut(target) {
                    let healed = c.heal(*amount);
                    sink.emit(CombatEvent::EntityHealed {
                        entity: target,
                        amount: healed,
                    });
                }
            }
        }
        Effect::RestoreSanity { amount } => {
            for target in living(ctx.roster, targets) {
                if let Some(c) = ctx.roster.get_mut(target) {
                    c.restore_sanity(*amount);
                    if let Some(sanity) = c.sanity() {
                        sink.emit(CombatEvent::SanityChanged {
                            entity: target,
                            current: sanity.current,
                        });
                    }
                }
            }
        }
        Effect::ApplyStatus { kind, duration } => {
            for target in living(ctx.roster, targets) {
                if let Some(c) = ctx.roster.get_mut(target) {
                    ctx.status.apply_status(c, *kind, *duration, sink);
                }
            }
        }
        Effect::ApplySelfStatus { kind, duration } => {
            if is_targetable(ctx.roster, actor)
                && let Some(c) = ctx.roster.get_mut(actor)
            {
                ctx.status.apply_status(c, *kind, *duration, sink);
            }
        }
        Effect::Protect => {
            for target in living(ctx.roster, targets) {
                if target == actor {
                    continue;
                }
                if let Err(err) = ctx.status.assign_guard(ctx.roster, actor, target, sink) {
                    warn!(target: "combat::pipeline", %actor, %target, %err, "guard not assigned");
                }
            }
        }
        Effect::GuardStance => {
            if is_targetable(ctx.roster, actor)
                && let Some(c) = ctx.roster.get_mut(actor)
            {
                c.set_guard_stance(true);
                debug!(target: "combat::pipeline", combatant = %c.name, "guard stance");
            }
        }
        Effect::SpeedBoost { percent, turns } => {
            for target in living(ctx.roster, targets) {
                if let Some(c) = ctx.roster.get_mut(target) {
                    c.apply_speed_boost(*percent, *turns);
                }
            }
        }
    }
}

fn pay_costs(
    profile: &ActionProfile,
    actor: CombatantId,
    ctx: &mut PipelineContext<'_>,
    sink: &mut dyn EventSink,
    report: &mut ActionReport,
) {
    if profile.sanity_cost > 0
        && let Some(c) = ctx.roster.get_mut(actor)
        && !c.is_inert()
    {
        if !c.spend_sanity(profile.sanity_cost) {
            // Sanity was lost since the announce; drain what is left.
            c.lose_sanity(profile.sanity_cost);
        }
        if let Some(sanity) = c.sanity() {
            sink.emit(CombatEvent::SanityChanged {
                entity: actor,
                current: sanity.current,
            });
        }
        if c.is_dead() {
            settle_death(ctx, actor, sink, report);
        }
    }

    if let Some(item) = &profile.item {
        match ctx.items.consume(item) {
            Ok(remaining) => {
                debug!(target: "combat::pipeline", item = %item, remaining, "item consumed")
            }
            Err(err) => {
                warn!(target: "combat::pipeline", item = %item, %err, "item vanished mid-action")
            }
        }
    }
}

/// Death teardown: statuses, guard links, scheduling.
fn settle_death(
    ctx: &mut PipelineContext<'_>,
    id: CombatantId,
    sink: &mut dyn EventSink,
    report: &mut ActionReport,
) {
    let Some(c) = ctx.roster.get(id) else {
        return;
    };
    if !c.is_dead() || c.is_inert() {
        return;
    }
    info!(target: "combat::pipeline", combatant = %c.name, "combatant died");

    ctx.status.handle_death(ctx.roster, id, sink);
    if let Some(c) = ctx.roster.get_mut(id) {
        c.mark_inert();
    }
    ctx.scheduler.remove(id);
    sink.emit(CombatEvent::CombatantDied { entity: id });
    report.deaths.push(id);
}

fn is_targetable(roster: &Roster, id: CombatantId) -> bool {
    roster.get(id).is_some_and(|c| c.is_alive() && !c.is_inert())
}

fn living(roster: &Roster, targets: &[CombatantId]) -> Vec<CombatantId> {
    targets
        .iter()
        .copied()
        .filter(|&id| is_targetable(roster, id))
        .collect()
}
