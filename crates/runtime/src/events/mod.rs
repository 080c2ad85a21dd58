//! Topic-based event bus for runtime events.
//!
//! Every [`combat_core::CombatEvent`] the battle emits is stamped with the
//! tick that produced it and published to one topic, plus a combined stream
//! that preserves emission order across topics.

mod bus;

pub use bus::{BusSink, Event, EventBus, Topic};
