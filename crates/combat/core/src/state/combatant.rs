//! Per-combatant state and mutators.

use crate::state::{ActionGauge, CombatantId, ResourceMeter, Side, Skill, StateError};
use crate::status::StatusEffects;

/// Temporary speed bonus granted by skills, separate from Agile/Slowed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedBoost {
    /// Bonus in percent (`50.0` = ×1.5).
    pub percent: f32,
    /// Own turns left before the boost wears off.
    pub turns: u32,
}

impl SpeedBoost {
    pub fn factor(&self) -> f32 {
        (1.0 + self.percent / 100.0).max(0.0)
    }
}

/// Stats a combatant enters the battle with.
///
/// `current_*` carry values persisted from earlier play. When absent the
/// combatant starts at its maximum. This is the only place vitals are
/// initialized.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantTemplate {
    pub name: String,
    pub side: Side,
    pub max_health: u32,
    /// Allies only; ignored for enemies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_sanity: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_health: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub current_sanity: Option<u32>,
    /// Gauge points gained per second.
    pub action_speed: f32,
    /// Power of the basic Attack.
    pub attack_power: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<Skill>,
}

impl CombatantTemplate {
    pub fn ally(name: impl Into<String>, max_health: u32, max_sanity: u32) -> Self {
        Self {
            name: name.into(),
            side: Side::Ally,
            max_health,
            max_sanity: Some(max_sanity),
            current_health: None,
            current_sanity: None,
            action_speed: 10.0,
            attack_power: 10,
            skills: Vec::new(),
        }
    }

    pub fn enemy(name: impl Into<String>, max_health: u32) -> Self {
        Self {
            name: name.into(),
            side: Side::Enemy,
            max_health,
            max_sanity: None,
            current_health: None,
            current_sanity: None,
            action_speed: 10.0,
            attack_power: 10,
            skills: Vec::new(),
        }
    }

    pub fn with_speed(mut self, action_speed: f32) -> Self {
        self.action_speed = action_speed;
        self
    }

    pub fn with_attack_power(mut self, attack_power: u32) -> Self {
        self.attack_power = attack_power;
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Restores a health value saved outside the battle.
    pub fn with_current_health(mut self, health: u32) -> Self {
        self.current_health = Some(health);
        self
    }

    pub fn with_current_sanity(mut self, sanity: u32) -> Self {
        self.current_sanity = Some(sanity);
        self
    }
}

/// A participant in the battle.
///
/// # Invariants
///
/// - Health and sanity stay inside `0..=maximum` (enforced by [`ResourceMeter`])
/// - Attack/defense/speed factors change only through the status engine
/// - `guarding` and `guarded_by` mirror each other across the pair
/// - Skill names are unique
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,

    health: ResourceMeter,
    sanity: Option<ResourceMeter>,
    pub action: ActionGauge,
    pub attack_power: u32,

    // === Status-derived factors (neutral = 1.0) ===
    base_action_speed: f32,
    speed_factor: f32,
    attack_multiplier: f32,
    defense_multiplier: f32,
    speed_boost: Option<SpeedBoost>,
    statuses: StatusEffects,

    // === Guarding ===
    guard_stance: bool,
    guarding: Option<CombatantId>,
    guarded_by: Option<CombatantId>,

    skills: Vec<Skill>,

    /// Set once death has been processed; inert combatants never act again.
    inert: bool,
}

impl Combatant {
    /// Builds a combatant from its template with an empty gauge.
    pub fn from_template(
        id: CombatantId,
        template: CombatantTemplate,
        gauge_max: f32,
    ) -> Result<Self, StateError> {
        let CombatantTemplate {
            name,
            side,
            max_health,
            max_sanity,
            current_health,
            current_sanity,
            action_speed,
            attack_power,
            skills,
        } = template;

        if max_health == 0 {
            return Err(StateError::InvalidMaximum {
                combatant: name,
                resource: "health",
            });
        }
        if !action_speed.is_finite() || action_speed < 0.0 {
            return Err(StateError::InvalidSpeed { combatant: name });
        }

        let sanity = match side {
            Side::Ally => match max_sanity {
                Some(max) if max > 0 => {
                    Some(ResourceMeter::new(current_sanity.unwrap_or(max), max))
                }
                _ => {
                    return Err(StateError::InvalidMaximum {
                        combatant: name,
                        resource: "sanity",
                    });
                }
            },
            Side::Enemy => None,
        };
        let health = ResourceMeter::new(current_health.unwrap_or(max_health), max_health);

        let mut combatant = Self {
            id,
            name,
            side,
            health,
            sanity,
            action: ActionGauge::new(gauge_max),
            attack_power,
            base_action_speed: action_speed,
            speed_factor: 1.0,
            attack_multiplier: 1.0,
            defense_multiplier: 1.0,
            speed_boost: None,
            statuses: StatusEffects::empty(),
            guard_stance: false,
            guarding: None,
            guarded_by: None,
            skills: Vec::with_capacity(skills.len()),
            inert: false,
        };
        for skill in skills {
            combatant.learn_skill(skill)?;
        }
        Ok(combatant)
    }

    // ========================================================================
    // Vitals
    // ========================================================================

    #[inline]
    pub fn is_ally(&self) -> bool {
        self.side == Side::Ally
    }

    /// Health exhausted, or an ally whose sanity is exhausted.
    pub fn is_dead(&self) -> bool {
        self.health.is_empty() || self.sanity.is_some_and(|s| s.is_empty())
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Death has been processed; the combatant is out of the fight.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub(crate) fn mark_inert(&mut self) {
        self.inert = true;
    }

    pub fn health(&self) -> ResourceMeter {
        self.health
    }

    pub fn sanity(&self) -> Option<ResourceMeter> {
        self.sanity
    }

    /// Removes health; returns the amount actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health.drain(amount)
    }

    /// Restores health up to the maximum; returns the amount gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        self.health.fill(amount)
    }

    /// Enemies have no sanity pool and can always pay.
    pub fn can_afford(&self, sanity_cost: u32) -> bool {
        self.sanity.is_none_or(|s| s.current >= sanity_cost)
    }

    /// Pays a skill cost. Returns false (and changes nothing) when short.
    pub fn spend_sanity(&mut self, cost: u32) -> bool {
        match &mut self.sanity {
            None => true,
            Some(meter) if meter.current >= cost => {
                meter.current -= cost;
                true
            }
            Some(_) => false,
        }
    }

    /// Sanity lost to enemy attacks; returns the amount removed.
    pub fn lose_sanity(&mut self, amount: u32) -> u32 {
        self.sanity.as_mut().map_or(0, |s| s.drain(amount))
    }

    pub fn restore_sanity(&mut self, amount: u32) -> u32 {
        self.sanity.as_mut().map_or(0, |s| s.fill(amount))
    }

    // ========================================================================
    // Gauge & speed
    // ========================================================================

    /// Adds `speed × delta` to the gauge. Returns true once the gauge is full.
    pub fn advance_action(&mut self, delta: f32) -> bool {
        let gain = self.effective_speed() * delta;
        self.action.advance(gain)
    }

    pub fn reset_action(&mut self) {
        self.action.reset();
    }

    pub fn base_action_speed(&self) -> f32 {
        self.base_action_speed
    }

    /// Changes the baseline; Agile/Slowed keep scaling the new value.
    pub fn set_base_action_speed(&mut self, speed: f32) {
        if speed.is_finite() && speed >= 0.0 {
            self.base_action_speed = speed;
        }
    }

    /// Base speed scaled by Agile/Slowed.
    pub fn action_speed(&self) -> f32 {
        self.base_action_speed * self.speed_factor
    }

    /// Speed actually used for gauge accumulation (status + boost).
    pub fn effective_speed(&self) -> f32 {
        self.action_speed() * self.speed_boost.map_or(1.0, |b| b.factor())
    }

    pub fn speed_boost(&self) -> Option<SpeedBoost> {
        self.speed_boost
    }

    /// Replaces any running boost.
    pub fn apply_speed_boost(&mut self, percent: f32, turns: u32) {
        self.speed_boost =
            (turns > 0 && percent.is_finite()).then_some(SpeedBoost { percent, turns });
    }

    /// Counts down the boost at the end of this combatant's turn.
    ///
    /// Returns true when the boost expired on this call.
    pub fn update_speed_boost_duration(&mut self) -> bool {
        let Some(boost) = self.speed_boost.as_mut() else {
            return false;
        };
        boost.turns = boost.turns.saturating_sub(1);
        if boost.turns == 0 {
            self.speed_boost = None;
            return true;
        }
        false
    }

    // ========================================================================
    // Status-derived multipliers (written by the status engine)
    // ========================================================================

    pub fn attack_multiplier(&self) -> f32 {
        self.attack_multiplier
    }

    pub fn defense_multiplier(&self) -> f32 {
        self.defense_multiplier
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    pub(crate) fn set_attack_multiplier(&mut self, value: f32) {
        self.attack_multiplier = value;
    }

    pub(crate) fn set_defense_multiplier(&mut self, value: f32) {
        self.defense_multiplier = value;
    }

    pub(crate) fn set_speed_factor(&mut self, value: f32) {
        self.speed_factor = value;
    }

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    pub(crate) fn statuses_mut(&mut self) -> &mut StatusEffects {
        &mut self.statuses
    }

    // ========================================================================
    // Guarding
    // ========================================================================

    pub fn in_guard_stance(&self) -> bool {
        self.guard_stance
    }

    pub(crate) fn set_guard_stance(&mut self, guarding: bool) {
        self.guard_stance = guarding;
    }

    /// Ally this combatant is intercepting damage for.
    pub fn guarding(&self) -> Option<CombatantId> {
        self.guarding
    }

    /// Combatant intercepting damage aimed at this one.
    pub fn guarded_by(&self) -> Option<CombatantId> {
        self.guarded_by
    }

    pub(crate) fn set_guarding(&mut self, ward: Option<CombatantId>) {
        self.guarding = ward;
    }

    pub(crate) fn set_guarded_by(&mut self, guardian: Option<CombatantId>) {
        self.guarded_by = guardian;
    }

    // ========================================================================
    // Skills
    // ========================================================================

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn skill(&self, index: usize) -> Option<&Skill> {
        self.skills.get(index)
    }

    pub fn find_skill(&self, name: &str) -> Option<(usize, &Skill)> {
        self.skills.iter().enumerate().find(|(_, s)| s.name == name)
    }

    pub fn learn_skill(&mut self, skill: Skill) -> Result<(), StateError> {
        if self.skills.iter().any(|s| s.name == skill.name) {
            return Err(StateError::DuplicateSkill {
                combatant: self.name.clone(),
                skill: skill.name,
            });
        }
        self.skills.push(skill);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Effect, TargetPolicy};

    fn ally() -> Combatant {
        Combatant::from_template(
            CombatantId(0),
            CombatantTemplate::ally("Mira", 100, 40).with_speed(20.0),
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn starts_at_max_unless_persisted() {
        let fresh = ally();
        assert_eq!(fresh.health().current, 100);
        assert_eq!(fresh.sanity().map(|s| s.current), Some(40));

        let restored = Combatant::from_template(
            CombatantId(0),
            CombatantTemplate::ally("Mira", 100, 40)
                .with_current_health(35)
                .with_current_sanity(12),
            100.0,
        )
        .unwrap();
        assert_eq!(restored.health().current, 35);
        assert_eq!(restored.sanity().map(|s| s.current), Some(12));
    }

    #[test]
    fn ally_dies_when_sanity_runs_out() {
        let mut mira = ally();
        mira.lose_sanity(40);
        assert!(mira.is_dead());
        assert_eq!(mira.health().current, 100);
    }

    #[test]
    fn enemies_ignore_sanity() {
        let mut imp = Combatant::from_template(
            CombatantId(1),
            CombatantTemplate::enemy("Imp", 30),
            100.0,
        )
        .unwrap();
        assert!(imp.sanity().is_none());
        assert!(imp.can_afford(999));
        assert!(imp.spend_sanity(999));
        assert_eq!(imp.lose_sanity(10), 0);
        assert!(imp.is_alive());
    }

    #[test]
    fn spend_sanity_is_all_or_nothing() {
        let mut mira = ally();
        assert!(!mira.spend_sanity(41));
        assert_eq!(mira.sanity().map(|s| s.current), Some(40));
        assert!(mira.spend_sanity(15));
        assert_eq!(mira.sanity().map(|s| s.current), Some(25));
    }

    #[test]
    fn speed_boost_stacks_on_status_speed_and_decays() {
        let mut mira = ally();
        mira.set_speed_factor(1.5);
        mira.apply_speed_boost(100.0, 2);
        assert_eq!(mira.action_speed(), 30.0);
        assert_eq!(mira.effective_speed(), 60.0);

        assert!(!mira.update_speed_boost_duration());
        assert!(mira.update_speed_boost_duration());
        assert_eq!(mira.effective_speed(), 30.0);
    }

    #[test]
    fn duplicate_skill_names_are_rejected() {
        let slash = Skill::new("Slash", "", 0, TargetPolicy::SingleEnemy)
            .with_effect(Effect::damage(10));
        let template = CombatantTemplate::ally("Mira", 100, 40)
            .with_skill(slash.clone())
            .with_skill(slash);
        let err = Combatant::from_template(CombatantId(0), template, 100.0).unwrap_err();
        assert!(matches!(err, StateError::DuplicateSkill { .. }));
    }

    #[test]
    fn ally_without_sanity_pool_is_invalid() {
        let mut template = CombatantTemplate::ally("Mira", 100, 40);
        template.max_sanity = None;
        let err = Combatant::from_template(CombatantId(0), template, 100.0).unwrap_err();
        assert_eq!(
            err,
            StateError::InvalidMaximum {
                combatant: "Mira".into(),
                resource: "sanity"
            }
        );
    }
}
