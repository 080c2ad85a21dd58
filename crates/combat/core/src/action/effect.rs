use crate::rng::RngOracle;
use crate::status::StatusKind;

/// How many times a damage effect strikes the same target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitCount {
    Fixed(u32),
    /// Inclusive range rolled once per action.
    Range { min: u32, max: u32 },
}

impl HitCount {
    pub fn roll(&self, rng: &dyn RngOracle, seed: u64) -> u32 {
        match *self {
            Self::Fixed(hits) => hits,
            Self::Range { min, max } => rng.range(seed, min.min(max), max.max(min)),
        }
    }
}

impl Default for HitCount {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Resolution order inside one action: vitals first, then statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectPhase {
    /// Damage and restoration.
    Vital,
    /// Status, guard and speed changes.
    Status,
}

/// One unit of what a skill, item or basic action does.
///
/// "Target" means each selected recipient; "actor" is the user.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// `power × attack multiplier`, repeated `hits` times per target.
    Damage {
        power: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        hits: HitCount,
    },
    /// Drains target sanity; no effect on enemies.
    SanityDamage { power: u32 },
    Heal { amount: u32 },
    RestoreSanity { amount: u32 },
    ApplyStatus { kind: StatusKind, duration: u32 },
    ApplySelfStatus { kind: StatusKind, duration: u32 },
    /// Actor becomes the target's guardian.
    Protect,
    /// Actor halves incoming damage until its next turn.
    GuardStance,
    SpeedBoost { percent: f32, turns: u32 },
}

impl Effect {
    /// Single-hit damage.
    pub fn damage(power: u32) -> Self {
        Self::Damage {
            power,
            hits: HitCount::Fixed(1),
        }
    }

    pub fn multi_hit(power: u32, hits: HitCount) -> Self {
        Self::Damage { power, hits }
    }

    pub fn phase(&self) -> EffectPhase {
        match self {
            Self::Damage { .. }
            | Self::SanityDamage { .. }
            | Self::Heal { .. }
            | Self::RestoreSanity { .. } => EffectPhase::Vital,
            Self::ApplyStatus { .. }
            | Self::ApplySelfStatus { .. }
            | Self::Protect
            | Self::GuardStance
            | Self::SpeedBoost { .. } => EffectPhase::Status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::PcgRng;

    #[test]
    fn vitals_resolve_before_statuses() {
        let mut effects = vec![
            Effect::ApplyStatus {
                kind: StatusKind::Vulnerable,
                duration: 2,
            },
            Effect::Heal { amount: 5 },
            Effect::damage(3),
        ];
        effects.sort_by_key(Effect::phase);

        assert_eq!(effects[0], Effect::Heal { amount: 5 });
        assert_eq!(effects[1], Effect::damage(3));
        assert_eq!(effects[2].phase(), EffectPhase::Status);
    }

    #[test]
    fn hit_range_stays_inside_bounds() {
        let rng = PcgRng;
        let hits = HitCount::Range { min: 2, max: 4 };
        for seed in 0..64 {
            let rolled = hits.roll(&rng, seed);
            assert!((2..=4).contains(&rolled));
        }
        assert_eq!(HitCount::Fixed(3).roll(&rng, 9), 3);
    }
}
