//! Single-hit damage resolution with guard redirection.

use tracing::debug;

use crate::config::CombatConfig;
use crate::event::{CombatEvent, EventSink};
use crate::state::{CombatantId, Roster};
use crate::status::StatusEngine;

/// Outcome of one hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    /// Combatant the hit was aimed at.
    pub intended: CombatantId,
    /// Combatant that actually lost health.
    pub recipient: CombatantId,
    pub amount: u32,
    pub redirected: bool,
    /// The recipient's health or sanity is exhausted after this hit.
    pub died: bool,
}

/// Deals one hit of `power` scaled by the attacker's multiplier.
///
/// A living guardian of `target` absorbs the hit with its own defense and
/// stance. Damage is `floor(power × attack × defense × stance)`, capped at
/// the recipient's remaining health. Returns `None` when the recipient is
/// already dead.
///
/// Death processing is left to the caller.
pub fn resolve_hit(
    roster: &mut Roster,
    status: &StatusEngine,
    config: &CombatConfig,
    attack_multiplier: f32,
    power: u32,
    target: CombatantId,
    sink: &mut dyn EventSink,
) -> Option<HitReport> {
    let guardian = status.guardian_of(roster, target);
    let recipient_id = guardian.unwrap_or(target);

    let recipient = roster.get_mut(recipient_id)?;
    if recipient.is_dead() || recipient.is_inert() {
        return None;
    }

    let stance = if recipient.in_guard_stance() {
        config.guard_reduction
    } else {
        1.0
    };
    let raw = power as f32 * attack_multiplier * recipient.defense_multiplier() * stance;
    let amount = recipient.take_damage(raw.max(0.0).floor() as u32);

    sink.emit(CombatEvent::EntityDamaged {
        entity: recipient_id,
        amount,
    });
    debug!(
        target: "combat::damage",
        recipient = %recipient.name,
        amount,
        redirected = guardian.is_some(),
        health = recipient.health().current,
        "hit resolved"
    );

    Some(HitReport {
        intended: target,
        recipient: recipient_id,
        amount,
        redirected: guardian.is_some(),
        died: recipient.is_dead(),
    })
}
