//! Target selection state machine.
//!
//! ```text
//! Idle ──begin──▶ Selecting ──Confirm──▶ Idle (Confirmed)
//!                     │
//!                     └────Cancel────▶ Idle (Cancelled)
//! ```
//!
//! The machine only moves highlights; it never touches combat state.

use tracing::debug;

use crate::action::{ActionKind, ResolvedAction, TargetPolicy, TargetSelection};
use crate::event::{CombatEvent, EventSink};
use crate::input::InputCommand;
use crate::state::{Combatant, CombatantId, Roster};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetingOutcome {
    /// Still choosing.
    Selecting,
    Confirmed(ResolvedAction),
    Cancelled,
    /// The policy had no living candidate; the machine stays idle.
    NoValidTarget,
    /// Command has no meaning in the current state.
    Ignored,
}

#[derive(Clone, Debug, Default)]
enum TargetingState {
    #[default]
    Idle,
    Selecting(Selection),
}

#[derive(Clone, Debug)]
struct Selection {
    actor: CombatantId,
    kind: ActionKind,
    group: bool,
    candidates: Vec<CombatantId>,
    cursor: usize,
    highlighted: Vec<CombatantId>,
}

#[derive(Clone, Debug, Default)]
pub struct TargetingMachine {
    state: TargetingState,
}

impl TargetingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, TargetingState::Selecting(_))
    }

    /// Candidate under the cursor (single-target policies only).
    pub fn current(&self) -> Option<CombatantId> {
        match &self.state {
            TargetingState::Selecting(sel) if !sel.group => sel.candidates.get(sel.cursor).copied(),
            _ => None,
        }
    }

    pub fn highlighted(&self) -> &[CombatantId] {
        match &self.state {
            TargetingState::Selecting(sel) => &sel.highlighted,
            TargetingState::Idle => &[],
        }
    }

    /// Starts selecting targets for `kind` under `policy`.
    ///
    /// Self-only actions confirm immediately without entering selection.
    pub fn begin(
        &mut self,
        actor: &Combatant,
        kind: ActionKind,
        policy: TargetPolicy,
        roster: &Roster,
        sink: &mut dyn EventSink,
    ) -> TargetingOutcome {
        if self.is_selecting() {
            return TargetingOutcome::Ignored;
        }
        if !policy.requires_target() {
            return TargetingOutcome::Confirmed(ResolvedAction::new(
                actor.id,
                kind,
                TargetSelection::Actor,
            ));
        }

        let candidates = policy.candidates(actor, roster);
        if candidates.is_empty() {
            debug!(target: "combat::targeting", actor = %actor.name, ?policy, "no valid target");
            return TargetingOutcome::NoValidTarget;
        }

        let group = policy.is_group();
        let mut selection = Selection {
            actor: actor.id,
            kind,
            group,
            candidates,
            cursor: 0,
            highlighted: Vec::new(),
        };
        if group {
            for id in selection.candidates.clone() {
                selection.highlight(id, sink);
            }
        } else {
            selection.highlight(selection.candidates[0], sink);
        }
        self.state = TargetingState::Selecting(selection);
        TargetingOutcome::Selecting
    }

    pub fn handle(&mut self, command: InputCommand, sink: &mut dyn EventSink) -> TargetingOutcome {
        let TargetingState::Selecting(sel) = &mut self.state else {
            return TargetingOutcome::Ignored;
        };

        match command {
            InputCommand::NavigateRight | InputCommand::NavigateDown if !sel.group => {
                sel.step(1, sink);
                TargetingOutcome::Selecting
            }
            InputCommand::NavigateLeft | InputCommand::NavigateUp if !sel.group => {
                sel.step(-1, sink);
                TargetingOutcome::Selecting
            }
            InputCommand::Confirm => {
                let target = if sel.group {
                    TargetSelection::Group(sel.candidates.clone())
                } else {
                    TargetSelection::Single(sel.candidates[sel.cursor])
                };
                let action = ResolvedAction::new(sel.actor, sel.kind.clone(), target);
                sel.clear(sink);
                self.state = TargetingState::Idle;
                TargetingOutcome::Confirmed(action)
            }
            InputCommand::Cancel => {
                sel.clear(sink);
                self.state = TargetingState::Idle;
                TargetingOutcome::Cancelled
            }
            _ => TargetingOutcome::Ignored,
        }
    }

    /// Drops candidates that died while the operator was choosing.
    ///
    /// Cancels the selection when nobody is left.
    pub fn refresh(&mut self, roster: &Roster, sink: &mut dyn EventSink) -> TargetingOutcome {
        let TargetingState::Selecting(sel) = &mut self.state else {
            return TargetingOutcome::Ignored;
        };

        let alive = |id: &CombatantId| {
            roster
                .get(*id)
                .is_some_and(|c| c.is_alive() && !c.is_inert())
        };
        if sel.candidates.iter().all(alive) {
            return TargetingOutcome::Selecting;
        }

        let current = sel.candidates.get(sel.cursor).copied();
        sel.clear(sink);
        sel.candidates.retain(alive);
        if sel.candidates.is_empty() {
            self.state = TargetingState::Idle;
            return TargetingOutcome::NoValidTarget;
        }

        if sel.group {
            for id in sel.candidates.clone() {
                sel.highlight(id, sink);
            }
        } else {
            sel.cursor = current
                .and_then(|id| sel.candidates.iter().position(|&c| c == id))
                .unwrap_or(0);
            sel.highlight(sel.candidates[sel.cursor], sink);
        }
        TargetingOutcome::Selecting
    }

    /// Abandons any selection, clearing highlights.
    pub fn reset(&mut self, sink: &mut dyn EventSink) {
        if let TargetingState::Selecting(sel) = &mut self.state {
            sel.clear(sink);
        }
        self.state = TargetingState::Idle;
    }
}

impl Selection {
    fn step(&mut self, direction: isize, sink: &mut dyn EventSink) {
        let len = self.candidates.len();
        let next = (self.cursor as isize + direction).rem_euclid(len as isize) as usize;
        if next == self.cursor {
            return;
        }
        self.unhighlight(self.candidates[self.cursor], sink);
        self.cursor = next;
        self.highlight(self.candidates[next], sink);
    }

    fn highlight(&mut self, id: CombatantId, sink: &mut dyn EventSink) {
        self.highlighted.push(id);
        sink.emit(CombatEvent::HighlightChanged {
            entity: id,
            highlighted: true,
        });
    }

    fn unhighlight(&mut self, id: CombatantId, sink: &mut dyn EventSink) {
        self.highlighted.retain(|&h| h != id);
        sink.emit(CombatEvent::HighlightChanged {
            entity: id,
            highlighted: false,
        });
    }

    fn clear(&mut self, sink: &mut dyn EventSink) {
        for id in std::mem::take(&mut self.highlighted) {
            sink.emit(CombatEvent::HighlightChanged {
                entity: id,
                highlighted: false,
            });
        }
    }
}
