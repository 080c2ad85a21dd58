//! Action-gauge turn scheduling.
//!
//! Gauges fill continuously at each combatant's effective speed. A full gauge
//! queues the combatant; the head of the queue becomes the single active
//! actor once nobody else is acting. Ties inside one tick resolve in roster
//! order.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::{CombatError, ErrorSeverity};
use crate::event::{CombatEvent, EventSink};
use crate::state::{CombatantId, Roster};
use crate::status::StatusEngine;

/// Misuse of the scheduler by the caller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("combatant {0} does not exist")]
    Unknown(CombatantId),

    #[error("combatant {0} is dead and cannot act")]
    DeadCombatant(CombatantId),

    #[error("combatant {active} is already acting")]
    AlreadyActive { active: CombatantId },
}

impl CombatError for SchedulerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyActive { .. } => ErrorSeverity::Validation,
            Self::Unknown(_) | Self::DeadCombatant(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "SCHEDULER_UNKNOWN_COMBATANT",
            Self::DeadCombatant(_) => "SCHEDULER_DEAD_COMBATANT",
            Self::AlreadyActive { .. } => "SCHEDULER_ALREADY_ACTIVE",
        }
    }
}

/// Ready queue plus the currently acting combatant.
#[derive(Clone, Debug, Default)]
pub struct ActionScheduler {
    active: Option<CombatantId>,
    ready: VecDeque<CombatantId>,
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<CombatantId> {
        self.active
    }

    /// True while a combatant holds the turn.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn ready_queue(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.ready.iter().copied()
    }

    /// Advances every eligible gauge by `speed × delta`.
    ///
    /// The active combatant and combatants already waiting in the queue do
    /// not accumulate. Returns the combatants that became ready on this call,
    /// in roster order.
    pub fn accumulate(&mut self, roster: &mut Roster, delta: f32) -> Vec<CombatantId> {
        let mut newly_ready = Vec::new();
        if !delta.is_finite() || delta <= 0.0 {
            return newly_ready;
        }

        for combatant in roster.iter_mut() {
            if combatant.is_dead() || combatant.is_inert() {
                continue;
            }
            if self.active == Some(combatant.id) || self.ready.contains(&combatant.id) {
                continue;
            }
            if combatant.advance_action(delta) {
                trace!(target: "combat::scheduler", combatant = %combatant.name, "gauge full");
                self.ready.push_back(combatant.id);
                newly_ready.push(combatant.id);
            }
        }
        newly_ready
    }

    /// Starts the next queued turn if nobody is acting.
    ///
    /// Dead entries are discarded. The promoted combatant's gauge restarts
    /// from zero.
    pub fn promote_next(&mut self, roster: &mut Roster) -> Option<CombatantId> {
        if self.active.is_some() {
            return None;
        }
        while let Some(id) = self.ready.pop_front() {
            let Some(combatant) = roster.get_mut(id) else {
                continue;
            };
            if combatant.is_dead() || combatant.is_inert() {
                continue;
            }
            combatant.reset_action();
            self.active = Some(id);
            debug!(target: "combat::scheduler", combatant = %combatant.name, "turn started");
            return Some(id);
        }
        None
    }

    /// Gives the turn to `id` immediately, bypassing the gauge.
    pub fn activate(&mut self, roster: &mut Roster, id: CombatantId) -> Result<(), SchedulerError> {
        if let Some(active) = self.active {
            return Err(SchedulerError::AlreadyActive { active });
        }
        let combatant = roster.get_mut(id).ok_or(SchedulerError::Unknown(id))?;
        if combatant.is_dead() || combatant.is_inert() {
            return Err(SchedulerError::DeadCombatant(id));
        }
        combatant.reset_action();
        self.ready.retain(|&queued| queued != id);
        self.active = Some(id);
        Ok(())
    }

    /// Drops `id` from scheduling (death).
    pub fn remove(&mut self, id: CombatantId) {
        self.ready.retain(|&queued| queued != id);
    }

    /// Finishes the active turn.
    ///
    /// Statuses and the speed boost of the actor count down here, strictly
    /// after its action resolved.
    pub fn end_turn(
        &mut self,
        roster: &mut Roster,
        status: &StatusEngine,
        sink: &mut dyn EventSink,
    ) -> Option<CombatantId> {
        let id = self.active.take()?;
        if let Some(actor) = roster.get_mut(id)
            && !actor.is_inert()
        {
            status.update_status_durations(actor, sink);
            if actor.update_speed_boost_duration() {
                debug!(target: "combat::scheduler", combatant = %actor.name, "speed boost expired");
            }
        }
        sink.emit(CombatEvent::TurnAdvanced { entity: id });
        Some(id)
    }
}
