//! Presentation events emitted by the engine.
//!
//! The engine never touches visual objects. Everything a UI needs to show
//! (messages, highlights, damage numbers, status icons) is published through
//! an [`EventSink`] in the order it happens.

use crate::action::RejectReason;
use crate::input::MenuPage;
use crate::state::CombatantId;
use crate::status::StatusKind;

/// Observable change produced while a battle runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// Text describing the action about to resolve.
    Announce { actor: CombatantId, text: String },

    HighlightChanged {
        entity: CombatantId,
        highlighted: bool,
    },

    /// Health lost by `entity` (after redirection and multipliers).
    EntityDamaged { entity: CombatantId, amount: u32 },

    EntityHealed { entity: CombatantId, amount: u32 },

    SanityChanged { entity: CombatantId, current: u32 },

    StatusApplied {
        entity: CombatantId,
        kind: StatusKind,
    },

    StatusRemoved {
        entity: CombatantId,
        kind: StatusKind,
    },

    CombatantDied { entity: CombatantId },

    /// A combatant's gauge filled and its turn began.
    TurnStarted {
        entity: CombatantId,
        needs_input: bool,
    },

    /// The acting combatant finished its turn.
    TurnAdvanced { entity: CombatantId },

    ActionRejected {
        actor: CombatantId,
        reason: RejectReason,
    },

    MenuChanged { page: MenuPage, cursor: usize },

    CombatEnded { won: bool },
}

/// Receiver for [`CombatEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CombatEvent) {}
}
