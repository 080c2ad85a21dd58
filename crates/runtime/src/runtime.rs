//! Runtime orchestrator and builder.
//!
//! [`Runtime`] spawns a battle worker that
//! owns the battle, then exposes a cloneable [`RuntimeHandle`] for input,
//! snapshots and event subscriptions.
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use combat_core::{Battle, CombatOutcome};

use crate::api::{CommandProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{BattleWorker, Command};

/// Runtime configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeConfig {
    /// Wall-clock time between ticks.
    pub tick_interval: Duration,
    /// Battle time, in seconds, each tick advances.
    pub time_step: f32,
    /// Give up with [`RuntimeError::Stalled`] after this many ticks.
    pub max_ticks: Option<u64>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    /// Ticks every `interval`, advancing the battle by the same amount.
    pub fn real_time(interval: Duration) -> Self {
        Self {
            tick_interval: interval,
            time_step: interval.as_secs_f32(),
            ..Self::default()
        }
    }

    pub fn with_time_step(mut self, seconds: f32) -> Self {
        self.time_step = seconds;
        self
    }

    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            time_step: 0.05,
            max_ticks: None,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that drives one battle to completion.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<Result<CombatOutcome>>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Wait for the battle to end and return its outcome.
    pub async fn wait(self) -> Result<CombatOutcome> {
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?
    }

    /// Stop the worker and wait for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone if the battle just ended.
        let _ = self.handle.shutdown().await;
        match self.wait().await {
            Ok(_) | Err(RuntimeError::Interrupted) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Builder for [`Runtime`]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    battle: Option<Battle>,
    provider: Option<Box<dyn CommandProvider>>,
    event_bus: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battle: None,
            provider: None,
            event_bus: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn battle(mut self, battle: Battle) -> Self {
        self.battle = Some(battle);
        self
    }

    /// Operator input source. Without one, input only arrives through
    /// [`RuntimeHandle::send_input`].
    pub fn provider(mut self, provider: impl CommandProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Publish onto an existing bus instead of a fresh one, so subscribers
    /// can attach before the first tick.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Spawn the battle worker. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let battle = self.battle.ok_or(RuntimeError::MissingBattle)?;

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());
        let worker = BattleWorker::new(battle, self.provider, command_rx, event_bus, self.config);
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
