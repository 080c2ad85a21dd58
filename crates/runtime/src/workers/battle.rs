//! Battle worker that owns the authoritative [`combat_core::Battle`].
//!
//! Ticks the battle on a fixed interval, pulls operator input from the
//! configured [`CommandProvider`] while an ally is waiting, serves
//! [`RuntimeHandle`](crate::RuntimeHandle) commands and publishes every engine
//! event to the [`EventBus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use combat_core::{Battle, BattlePhase, CombatOutcome, CommandOutcome, FinalVitals, InputCommand};

use crate::api::{BattleSnapshot, CommandProvider, InputView, Result, RuntimeError};
use crate::events::{BusSink, EventBus};
use crate::runtime::RuntimeConfig;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Apply one operator command right away.
    Input {
        command: InputCommand,
        reply: oneshot::Sender<CommandOutcome>,
    },
    /// Query the current battle state (read-only).
    Snapshot { reply: oneshot::Sender<BattleSnapshot> },
    /// Stop before the battle ends.
    Shutdown,
}

/// Background task that drives one battle to completion.
pub struct BattleWorker {
    battle: Battle,
    provider: Option<Box<dyn CommandProvider>>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    config: RuntimeConfig,
    tick: u64,
}

impl BattleWorker {
    pub fn new(
        battle: Battle,
        provider: Option<Box<dyn CommandProvider>>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        config: RuntimeConfig,
    ) -> Self {
        info!(
            target: "runtime::worker",
            combatants = battle.roster().len(),
            has_provider = provider.is_some(),
            "BattleWorker initialized"
        );

        Self {
            battle,
            provider,
            command_rx,
            event_bus,
            config,
            tick: 0,
        }
    }

    /// Main worker loop. Returns once the battle ends, the handle asks for a
    /// shutdown or the tick limit is hit.
    pub async fn run(mut self) -> Result<CombatOutcome> {
        let period = self.config.tick_interval.max(Duration::from_millis(1));
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(outcome) = self.step().await? {
                        info!(
                            target: "runtime::worker",
                            won = outcome.won,
                            ticks = self.tick,
                            "battle finished"
                        );
                        return Ok(outcome);
                    }
                }
                command = self.command_rx.recv(), if commands_open => match command {
                    Some(command) => {
                        if !self.handle_command(command) {
                            info!(
                                target: "runtime::worker",
                                ticks = self.tick,
                                "shutdown requested"
                            );
                            return Err(RuntimeError::Interrupted);
                        }
                    }
                    None => {
                        debug!(target: "runtime::worker", "all handles dropped");
                        commands_open = false;
                    }
                },
            }
        }
    }

    async fn step(&mut self) -> Result<Option<CombatOutcome>> {
        self.tick += 1;
        let phase = {
            let mut sink = BusSink::new(&self.event_bus, self.tick);
            self.battle.tick(self.config.time_step, &mut sink)
        };

        match phase {
            BattlePhase::Ended { .. } => return Ok(self.battle.outcome()),
            BattlePhase::AwaitingInput(actor) => self.poll_provider(actor).await?,
            BattlePhase::Running | BattlePhase::Resolving(_) => {}
        }

        if let Some(max) = self.config.max_ticks
            && self.tick >= max
        {
            warn!(target: "runtime::worker", ticks = self.tick, "tick limit reached");
            return Err(RuntimeError::Stalled { ticks: self.tick });
        }
        Ok(None)
    }

    async fn poll_provider(&mut self, actor: combat_core::CombatantId) -> Result<()> {
        let Some(provider) = &self.provider else {
            return Ok(());
        };
        let view = InputView::capture(&self.battle, actor);
        if let Some(command) = provider.next_command(&view).await? {
            let outcome = self.apply_input(command);
            debug!(target: "runtime::worker", ?command, ?outcome, "provider command applied");
        }
        Ok(())
    }

    /// Returns `false` when the worker should stop.
    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Input { command, reply } => {
                let outcome = self.apply_input(command);
                if reply.send(outcome).is_err() {
                    debug!(target: "runtime::worker", "input reply dropped");
                }
                true
            }
            Command::Snapshot { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!(target: "runtime::worker", "snapshot reply dropped");
                }
                true
            }
            Command::Shutdown => false,
        }
    }

    fn apply_input(&mut self, command: InputCommand) -> CommandOutcome {
        let mut sink = BusSink::new(&self.event_bus, self.tick);
        self.battle.handle_command(command, &mut sink)
    }

    fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            tick: self.tick,
            phase: self.battle.phase(),
            active: self.battle.active(),
            vitals: self.battle.roster().iter().map(FinalVitals::from).collect(),
        }
    }
}
