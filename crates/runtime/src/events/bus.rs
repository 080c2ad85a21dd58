//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use combat_core::{CombatEvent, EventSink};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Vital changes, statuses, deaths, announcements and the final result
    Battle,
    /// Turn start and turn end
    Turn,
    /// Menu, highlight and rejection feedback for the operator
    Input,
}

/// Engine event stamped with the runtime tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tick: u64,
    pub combat: CombatEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self.combat {
            CombatEvent::TurnStarted { .. } | CombatEvent::TurnAdvanced { .. } => Topic::Turn,
            CombatEvent::HighlightChanged { .. }
            | CombatEvent::MenuChanged { .. }
            | CombatEvent::ActionRejected { .. } => Topic::Input,
            CombatEvent::Announce { .. }
            | CombatEvent::EntityDamaged { .. }
            | CombatEvent::EntityHealed { .. }
            | CombatEvent::SanityChanged { .. }
            | CombatEvent::StatusApplied { .. }
            | CombatEvent::StatusRemoved { .. }
            | CombatEvent::CombatantDied { .. }
            | CombatEvent::CombatEnded { .. } => Topic::Battle,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about, or to the full
/// ordered stream with [`EventBus::subscribe_all`].
#[derive(Clone)]
pub struct EventBus {
    battle: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    input: broadcast::Sender<Event>,
    all: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            battle: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            input: broadcast::channel(capacity).0,
            all: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Battle => &self.battle,
            Topic::Turn => &self.turn,
            Topic::Input => &self.input,
        }
    }

    /// Publish an event to its topic and to the combined stream.
    ///
    /// Publishing never blocks; events without subscribers are dropped.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event.clone()).is_err() {
            tracing::trace!(target: "runtime::events", ?topic, "no subscribers for topic");
        }
        let _ = self.all.send(event);
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to every event in publication order
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// [`EventSink`] that forwards engine events onto an [`EventBus`].
pub struct BusSink<'a> {
    bus: &'a EventBus,
    tick: u64,
}

impl<'a> BusSink<'a> {
    pub fn new(bus: &'a EventBus, tick: u64) -> Self {
        Self { bus, tick }
    }
}

impl EventSink for BusSink<'_> {
    fn emit(&mut self, event: CombatEvent) {
        self.bus.publish(Event {
            tick: self.tick,
            combat: event,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CombatantId;

    #[tokio::test]
    async fn events_route_to_their_topic_and_the_combined_stream() {
        let bus = EventBus::with_capacity(8);
        let mut battle_rx = bus.subscribe(Topic::Battle);
        let mut turn_rx = bus.subscribe(Topic::Turn);
        let mut all_rx = bus.subscribe_all();

        let mut sink = BusSink::new(&bus, 7);
        sink.emit(CombatEvent::TurnStarted {
            entity: CombatantId(0),
            needs_input: true,
        });
        sink.emit(CombatEvent::EntityDamaged {
            entity: CombatantId(1),
            amount: 12,
        });

        let turn = turn_rx.recv().await.unwrap();
        assert_eq!(turn.tick, 7);
        assert_eq!(turn.topic(), Topic::Turn);

        let battle = battle_rx.recv().await.unwrap();
        assert!(matches!(
            battle.combat,
            CombatEvent::EntityDamaged { amount: 12, .. }
        ));
        assert!(battle_rx.try_recv().is_err());

        assert_eq!(all_rx.recv().await.unwrap().topic(), Topic::Turn);
        assert_eq!(all_rx.recv().await.unwrap().topic(), Topic::Battle);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(Event {
            tick: 0,
            combat: CombatEvent::CombatEnded { won: true },
        });
    }
}
