//! Battle context: owns every component and drives one fight.
//!
//! Per tick, in order:
//!
//! 1. Advance the pending action's announce wait (and apply it when due)
//! 2. Fill gauges (paused in [`AtbMode::Wait`] while someone is acting)
//! 3. Promote the next ready combatant; allies open the command menu,
//!    enemies consult the [`EnemyPolicy`]
//!
//! Operator commands go through [`Battle::handle_command`].
mod builder;
mod outcome;

pub use builder::BattleBuilder;
pub use outcome::{BattlePhase, CombatOutcome, CommandOutcome, FinalVitals};

use tracing::{info, warn};

use crate::action::{
    ActionKind, ActionProfile, ActionReport, ExecutionPipeline, PipelineContext, PipelineStep,
    RejectReason, ResolvedAction,
};
use crate::config::{AtbMode, CombatConfig};
use crate::event::{CombatEvent, EventSink};
use crate::input::{CommandMenu, InputCommand, MenuOutcome, TargetingMachine, TargetingOutcome};
use crate::policy::EnemyPolicy;
use crate::rng::PcgRng;
use crate::scheduler::{ActionScheduler, SchedulerError};
use crate::state::{Combatant, CombatantId, ItemPool, Roster, Side};
use crate::status::StatusEngine;

pub struct Battle {
    config: CombatConfig,
    roster: Roster,
    items: ItemPool,
    scheduler: ActionScheduler,
    status: StatusEngine,
    menu: CommandMenu,
    targeting: TargetingMachine,
    pipeline: ExecutionPipeline,
    policy: Box<dyn EnemyPolicy>,
    rng: PcgRng,
    seed: u64,
    nonce: u64,
    phase: BattlePhase,
}

impl Battle {
    pub fn builder() -> BattleBuilder {
        BattleBuilder::new()
    }

    pub(crate) fn new(
        config: CombatConfig,
        roster: Roster,
        items: ItemPool,
        policy: Box<dyn EnemyPolicy>,
        seed: u64,
    ) -> Self {
        let status = StatusEngine::new(config.status);
        Self {
            config,
            roster,
            items,
            scheduler: ActionScheduler::new(),
            status,
            menu: CommandMenu::new(),
            targeting: TargetingMachine::new(),
            pipeline: ExecutionPipeline::new(),
            policy,
            rng: PcgRng,
            seed,
            nonce: 0,
            phase: BattlePhase::Running,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.get(id)
    }

    pub fn items(&self) -> &ItemPool {
        &self.items
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn targeting(&self) -> &TargetingMachine {
        &self.targeting
    }

    pub fn status_engine(&self) -> &StatusEngine {
        &self.status
    }

    /// Combatant holding the turn.
    pub fn active(&self) -> Option<CombatantId> {
        self.scheduler.active()
    }

    // ========================================================================
    // Driving
    // ========================================================================

    /// Advances the battle by `delta` seconds.
    pub fn tick(&mut self, delta: f32, sink: &mut dyn EventSink) -> BattlePhase {
        if self.phase.is_over() {
            return self.phase;
        }
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };

        if self.pipeline.is_busy() {
            let (pipeline, mut ctx) = self.split();
            if let PipelineStep::Completed(report) = pipeline.advance(delta, &mut ctx, sink) {
                self.finish_action(report, sink);
                if self.phase.is_over() {
                    return self.phase;
                }
            }
        }

        let paused = self.config.atb_mode == AtbMode::Wait && self.phase != BattlePhase::Running;
        if !paused {
            self.scheduler.accumulate(&mut self.roster, delta);
        }

        if matches!(self.phase, BattlePhase::AwaitingInput(_))
            && self.targeting.refresh(&self.roster, sink) == TargetingOutcome::NoValidTarget
        {
            self.reopen_menu(sink);
        }

        if !self.scheduler.is_busy()
            && let Some(id) = self.scheduler.promote_next(&mut self.roster)
        {
            self.start_turn(id, sink);
        }
        self.phase
    }

    /// Hands the turn to `id` right away, skipping its gauge.
    pub fn force_turn(
        &mut self,
        id: CombatantId,
        sink: &mut dyn EventSink,
    ) -> Result<(), SchedulerError> {
        if let Some(active) = self.scheduler.active().or(self.pipeline.pending_actor()) {
            return Err(SchedulerError::AlreadyActive { active });
        }
        self.scheduler.activate(&mut self.roster, id)?;
        self.start_turn(id, sink);
        Ok(())
    }

    /// Routes one operator command to the menu or the targeting machine.
    pub fn handle_command(
        &mut self,
        command: InputCommand,
        sink: &mut dyn EventSink,
    ) -> CommandOutcome {
        let BattlePhase::AwaitingInput(id) = self.phase else {
            return CommandOutcome::Ignored;
        };

        if self.targeting.is_selecting() {
            return match self.targeting.handle(command, sink) {
                TargetingOutcome::Selecting => CommandOutcome::Targeting,
                TargetingOutcome::Confirmed(action) => self.commit(action, sink),
                TargetingOutcome::Cancelled => {
                    self.reopen_menu(sink);
                    CommandOutcome::MenuUpdated
                }
                TargetingOutcome::NoValidTarget | TargetingOutcome::Ignored => {
                    CommandOutcome::Ignored
                }
            };
        }

        let Some(actor) = self.roster.get(id) else {
            return CommandOutcome::Ignored;
        };
        match self.menu.handle(command, actor, &self.items, sink) {
            MenuOutcome::Navigated => CommandOutcome::MenuUpdated,
            MenuOutcome::Ignored => CommandOutcome::Ignored,
            MenuOutcome::Chose(kind) => self.choose(id, kind, sink),
        }
    }

    /// Outcome once the battle has ended.
    pub fn outcome(&self) -> Option<CombatOutcome> {
        let BattlePhase::Ended { won } = self.phase else {
            return None;
        };
        Some(CombatOutcome {
            won,
            items: self.items.clone(),
            final_vitals: self.roster.iter().map(FinalVitals::from).collect(),
        })
    }

    // ========================================================================
    // Turn flow
    // ========================================================================

    fn start_turn(&mut self, id: CombatantId, sink: &mut dyn EventSink) {
        // Stance and protection last until the holder's next turn.
        if let Some(actor) = self.roster.get_mut(id) {
            actor.set_guard_stance(false);
        }
        self.status.release_guard(&mut self.roster, id, sink);

        let Some(actor) = self.roster.get(id) else {
            return;
        };
        let needs_input = actor.is_ally();
        info!(target: "combat::battle", combatant = %actor.name, needs_input, "turn started");
        sink.emit(CombatEvent::TurnStarted {
            entity: id,
            needs_input,
        });

        if needs_input {
            self.phase = BattlePhase::AwaitingInput(id);
            self.menu.open(actor, &self.items, sink);
        } else {
            self.run_enemy_turn(id, sink);
        }
    }

    fn run_enemy_turn(&mut self, id: CombatantId, sink: &mut dyn EventSink) {
        let Some(actor) = self.roster.get(id) else {
            return;
        };
        let opponents: Vec<&Combatant> = self.roster.living(actor.side.opponent()).collect();
        let intent = self.policy.decide(actor, &opponents, sink);

        let Some(intent) = intent else {
            info!(target: "combat::battle", combatant = %actor.name, "enemy passes");
            self.pass_turn(sink);
            return;
        };
        let action = ResolvedAction::new(id, intent.action, intent.target);
        if self.submit(action, sink).is_err() {
            self.pass_turn(sink);
        }
    }

    fn choose(
        &mut self,
        id: CombatantId,
        kind: ActionKind,
        sink: &mut dyn EventSink,
    ) -> CommandOutcome {
        let Some(actor) = self.roster.get(id) else {
            return CommandOutcome::Ignored;
        };
        let profile = match ActionProfile::resolve(&kind, actor, &self.items) {
            Ok(profile) => profile,
            Err(reason) => return self.reject(id, reason, sink),
        };

        match self
            .targeting
            .begin(actor, kind, profile.targeting, &self.roster, sink)
        {
            TargetingOutcome::Confirmed(action) => self.commit(action, sink),
            TargetingOutcome::Selecting => CommandOutcome::Targeting,
            TargetingOutcome::NoValidTarget => self.reject(id, RejectReason::NoValidTarget, sink),
            TargetingOutcome::Cancelled | TargetingOutcome::Ignored => CommandOutcome::Ignored,
        }
    }

    fn commit(&mut self, action: ResolvedAction, sink: &mut dyn EventSink) -> CommandOutcome {
        match self.submit(action, sink) {
            Ok(()) => {
                self.menu.close();
                CommandOutcome::ActionStarted
            }
            Err(reason) => {
                self.reopen_menu(sink);
                CommandOutcome::Rejected(reason)
            }
        }
    }

    /// Starts the pipeline. Rejections are reported by the pipeline itself.
    fn submit(
        &mut self,
        action: ResolvedAction,
        sink: &mut dyn EventSink,
    ) -> Result<(), RejectReason> {
        let actor = action.actor;
        self.nonce += 1;
        let nonce = self.nonce;
        let (pipeline, mut ctx) = self.split();
        pipeline.start(action, nonce, &mut ctx, sink)?;
        self.phase = BattlePhase::Resolving(actor);
        Ok(())
    }

    fn reject(
        &mut self,
        id: CombatantId,
        reason: RejectReason,
        sink: &mut dyn EventSink,
    ) -> CommandOutcome {
        warn!(target: "combat::battle", actor = %id, %reason, "action rejected");
        sink.emit(CombatEvent::ActionRejected { actor: id, reason });
        self.reopen_menu(sink);
        CommandOutcome::Rejected(reason)
    }

    fn reopen_menu(&mut self, sink: &mut dyn EventSink) {
        if let BattlePhase::AwaitingInput(id) = self.phase
            && let Some(actor) = self.roster.get(id)
        {
            self.menu.reset(actor, &self.items, sink);
        }
    }

    fn pass_turn(&mut self, sink: &mut dyn EventSink) {
        self.scheduler.end_turn(&mut self.roster, &self.status, sink);
        self.phase = BattlePhase::Running;
    }

    fn finish_action(&mut self, report: ActionReport, sink: &mut dyn EventSink) {
        info!(
            target: "combat::battle",
            actor = %report.actor,
            action = %report.name,
            hits = report.hits.len(),
            deaths = report.deaths.len(),
            "action resolved"
        );
        self.phase = BattlePhase::Running;

        // A wiped party loses even if the last enemy fell in the same action.
        let won = if self.roster.is_defeated(Side::Ally) {
            false
        } else if self.roster.is_defeated(Side::Enemy) {
            true
        } else {
            return;
        };

        info!(target: "combat::battle", won, "combat ended");
        self.phase = BattlePhase::Ended { won };
        self.menu.close();
        self.targeting.reset(sink);
        sink.emit(CombatEvent::CombatEnded { won });
    }

    fn split(&mut self) -> (&mut ExecutionPipeline, PipelineContext<'_>) {
        (
            &mut self.pipeline,
            PipelineContext {
                roster: &mut self.roster,
                items: &mut self.items,
                status: &self.status,
                scheduler: &mut self.scheduler,
                config: &self.config,
                rng: &self.rng,
                seed: self.seed,
            },
        )
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("phase", &self.phase)
            .field("active", &self.scheduler.active())
            .field("roster", &self.roster.len())
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}
