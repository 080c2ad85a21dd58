//! Status application, cancellation, expiry and guard bookkeeping.
//!
//! # Rules
//!
//! - One instance per kind; re-applying refreshes the duration
//! - Opposites (Strength/Weakness, Tough/Vulnerable, Agile/Slowed) cancel:
//!   applying one while the other is active removes the other, resets the
//!   stat to neutral and applies nothing
//! - Durations count down once at the end of the owner's turn
//! - `Guarded` is untimed and always paired with a guardian link

use tracing::{debug, info, warn};

use crate::event::{CombatEvent, EventSink};
use crate::state::{Combatant, CombatantId, Roster};
use crate::status::{GuardError, ModifiedStat, StatusKind};

/// Multipliers produced by each timed status.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusTuning {
    pub strength: f32,
    pub weakness: f32,
    pub tough: f32,
    pub vulnerable: f32,
    pub agile: f32,
    pub slowed: f32,
}

impl StatusTuning {
    pub fn factor(&self, kind: StatusKind) -> f32 {
        match kind {
            StatusKind::Strength => self.strength,
            StatusKind::Weakness => self.weakness,
            StatusKind::Tough => self.tough,
            StatusKind::Vulnerable => self.vulnerable,
            StatusKind::Agile => self.agile,
            StatusKind::Slowed => self.slowed,
            StatusKind::Guarded => 1.0,
        }
    }
}

impl Default for StatusTuning {
    fn default() -> Self {
        Self {
            strength: 1.5,
            weakness: 0.5,
            tough: 0.5,
            vulnerable: 1.5,
            agile: 1.5,
            slowed: 0.5,
        }
    }
}

/// Result of [`StatusEngine::apply_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusOutcome {
    Applied,
    /// Already present; duration replaced.
    Refreshed,
    /// The opposite status was removed and nothing was applied.
    Cancelled { removed: StatusKind },
    /// Dead target or zero duration.
    Ignored,
}

/// Sole authority over statuses, derived multipliers and guard links.
#[derive(Clone, Debug, Default)]
pub struct StatusEngine {
    tuning: StatusTuning,
}

impl StatusEngine {
    pub fn new(tuning: StatusTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &StatusTuning {
        &self.tuning
    }

    pub fn apply_status(
        &self,
        target: &mut Combatant,
        kind: StatusKind,
        duration: u32,
        sink: &mut dyn EventSink,
    ) -> StatusOutcome {
        if target.is_dead() || target.is_inert() {
            debug!(
                target: "combat::status",
                combatant = %target.name,
                %kind,
                "status ignored on dead combatant"
            );
            return StatusOutcome::Ignored;
        }

        if let Some(opposite) = kind.opposite()
            && target.statuses().has(opposite)
        {
            self.remove_status(target, opposite, sink);
            info!(
                target: "combat::status",
                combatant = %target.name,
                applied = %kind,
                cancelled = %opposite,
                "opposing statuses cancel out"
            );
            return StatusOutcome::Cancelled { removed: opposite };
        }

        let remaining = if kind.is_timed() {
            if duration == 0 {
                warn!(
                    target: "combat::status",
                    combatant = %target.name,
                    %kind,
                    "zero-duration status ignored"
                );
                return StatusOutcome::Ignored;
            }
            Some(duration)
        } else {
            None
        };

        let refreshed = target.statuses_mut().set(kind, remaining);
        if let Some(stat) = kind.stat() {
            self.recompute(target, stat);
        }
        sink.emit(CombatEvent::StatusApplied {
            entity: target.id,
            kind,
        });
        debug!(
            target: "combat::status",
            combatant = %target.name,
            %kind,
            ?remaining,
            refreshed,
            "status applied"
        );

        if refreshed {
            StatusOutcome::Refreshed
        } else {
            StatusOutcome::Applied
        }
    }

    /// Drops `kind` and resets its stat. Returns false if it was not active.
    pub fn remove_status(
        &self,
        target: &mut Combatant,
        kind: StatusKind,
        sink: &mut dyn EventSink,
    ) -> bool {
        if !target.statuses_mut().remove(kind) {
            return false;
        }
        if let Some(stat) = kind.stat() {
            self.recompute(target, stat);
        }
        sink.emit(CombatEvent::StatusRemoved {
            entity: target.id,
            kind,
        });
        debug!(target: "combat::status", combatant = %target.name, %kind, "status removed");
        true
    }

    /// Counts down every timed status by one owner turn.
    ///
    /// Returns the kinds that expired (and were removed).
    pub fn update_status_durations(
        &self,
        target: &mut Combatant,
        sink: &mut dyn EventSink,
    ) -> Vec<StatusKind> {
        let expired = target.statuses_mut().count_down();
        for &kind in &expired {
            self.remove_status(target, kind, sink);
        }
        expired
    }

    /// Strips every status and resets all factors to neutral.
    ///
    /// Does not touch guard links; use [`Self::handle_death`] for teardown.
    pub fn clear_all_statuses(&self, target: &mut Combatant, sink: &mut dyn EventSink) {
        let kinds: Vec<_> = target.statuses().kinds().collect();
        for kind in kinds {
            self.remove_status(target, kind, sink);
        }
        target.set_attack_multiplier(1.0);
        target.set_defense_multiplier(1.0);
        target.set_speed_factor(1.0);
    }

    /// Death teardown: guard links in both directions, statuses, stance, boost.
    pub fn handle_death(&self, roster: &mut Roster, id: CombatantId, sink: &mut dyn EventSink) {
        self.release_guard(roster, id, sink);
        self.release_guardian_of(roster, id, sink);
        if let Some(dead) = roster.get_mut(id) {
            self.clear_all_statuses(dead, sink);
            dead.set_guard_stance(false);
            dead.apply_speed_boost(0.0, 0);
        }
    }

    fn recompute(&self, target: &mut Combatant, stat: ModifiedStat) {
        // Opposites never coexist, so at most one kind contributes.
        let factor: f32 = target
            .statuses()
            .kinds()
            .filter(|k| k.stat() == Some(stat))
            .map(|k| self.tuning.factor(k))
            .product();

        match stat {
            ModifiedStat::Attack => target.set_attack_multiplier(factor),
            ModifiedStat::Defense => target.set_defense_multiplier(factor),
            ModifiedStat::Speed => target.set_speed_factor(factor),
        }
    }

    // ========================================================================
    // Guard links
    // ========================================================================

    /// Makes `guardian` intercept all damage aimed at `ward`.
    ///
    /// Previous links of either participant are released first. Cycles and
    /// chains are rejected.
    pub fn assign_guard(
        &self,
        roster: &mut Roster,
        guardian: CombatantId,
        ward: CombatantId,
        sink: &mut dyn EventSink,
    ) -> Result<(), GuardError> {
        if guardian == ward {
            return Err(GuardError::SelfGuard(guardian));
        }
        let g = roster
            .get(guardian)
            .ok_or(GuardError::UnknownCombatant(guardian))?;
        let w = roster.get(ward).ok_or(GuardError::UnknownCombatant(ward))?;

        if g.is_dead() || g.is_inert() {
            return Err(GuardError::Dead(guardian));
        }
        if w.is_dead() || w.is_inert() {
            return Err(GuardError::Dead(ward));
        }
        if g.side != w.side {
            return Err(GuardError::OpposingSides(guardian));
        }
        if let Some(by) = g.guarded_by() {
            return Err(GuardError::GuardianIsGuarded { guardian, by });
        }
        if let Some(protecting) = w.guarding() {
            return Err(GuardError::WardIsGuarding { ward, protecting });
        }
        if g.guarding() == Some(ward) {
            return Ok(());
        }

        self.release_guard(roster, guardian, sink);
        self.release_guardian_of(roster, ward, sink);

        let (g, w) = roster
            .pair_mut(guardian, ward)
            .ok_or(GuardError::UnknownCombatant(ward))?;
        g.set_guarding(Some(ward));
        w.set_guarded_by(Some(guardian));
        self.apply_status(w, StatusKind::Guarded, 0, sink);

        info!(target: "combat::status", %guardian, %ward, "guard assigned");
        Ok(())
    }

    /// Ends whatever protection `guardian` provides. Returns the former ward.
    pub fn release_guard(
        &self,
        roster: &mut Roster,
        guardian: CombatantId,
        sink: &mut dyn EventSink,
    ) -> Option<CombatantId> {
        let ward = roster.get(guardian)?.guarding()?;
        roster.get_mut(guardian)?.set_guarding(None);

        if let Some(w) = roster.get_mut(ward)
            && w.guarded_by() == Some(guardian)
        {
            w.set_guarded_by(None);
            self.remove_status(w, StatusKind::Guarded, sink);
        }
        debug!(target: "combat::status", %guardian, %ward, "guard released");
        Some(ward)
    }

    /// Detaches `ward` from its guardian. Returns the former guardian.
    pub fn release_guardian_of(
        &self,
        roster: &mut Roster,
        ward: CombatantId,
        sink: &mut dyn EventSink,
    ) -> Option<CombatantId> {
        let guardian = roster.get(ward)?.guarded_by()?;
        if roster.get(guardian).and_then(|g| g.guarding()) == Some(ward) {
            self.release_guard(roster, guardian, sink);
        } else {
            let w = roster.get_mut(ward)?;
            w.set_guarded_by(None);
            self.remove_status(w, StatusKind::Guarded, sink);
        }
        Some(guardian)
    }

    /// Living guardian currently intercepting damage for `ward`.
    pub fn guardian_of(&self, roster: &Roster, ward: CombatantId) -> Option<CombatantId> {
        let w = roster.get(ward)?;
        if !w.statuses().has(StatusKind::Guarded) {
            return None;
        }
        let guardian = w.guarded_by()?;
        let g = roster.get(guardian)?;
        (g.is_alive() && !g.is_inert() && g.guarding() == Some(ward)).then_some(guardian)
    }
}
