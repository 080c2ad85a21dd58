//! Async driver for a [`combat_core::Battle`].
//!
//! The core engine is synchronous and tick-driven. This crate owns a battle
//! inside a tokio task, advances it on a fixed interval, asks a
//! [`CommandProvider`] for operator input whenever an ally is waiting, and
//! republishes every engine event on a topic-based [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the battle task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    AutoConfirmProvider, BattleSnapshot, CommandProvider, InputView, Result, RuntimeError,
    RuntimeHandle, ScriptedCommandProvider,
};
pub use events::{BusSink, Event, EventBus, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
