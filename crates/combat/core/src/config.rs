use crate::status::StatusTuning;

/// How gauges behave while an ally waits for operator input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AtbMode {
    /// Gauges pause while the command menu or targeting is open.
    #[default]
    Wait,
    /// Gauges keep filling for everyone except the acting ally.
    Active,
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Gauge value a combatant must reach before acting.
    pub gauge_max: f32,

    /// Seconds between announcing an action and applying its effects.
    pub announce_delay: f32,

    /// Damage factor applied to a combatant in guard stance.
    pub guard_reduction: f32,

    pub atb_mode: AtbMode,

    /// Multipliers produced by timed status effects.
    pub status: StatusTuning,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// One slot per status kind.
    pub const MAX_STATUS_EFFECTS: usize = 7;
    pub const MAX_PARTY_SIZE: usize = 8;
    pub const MAX_ENEMIES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_GAUGE_MAX: f32 = 100.0;
    pub const DEFAULT_ANNOUNCE_DELAY: f32 = 1.0;
    pub const DEFAULT_GUARD_REDUCTION: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            gauge_max: Self::DEFAULT_GAUGE_MAX,
            announce_delay: Self::DEFAULT_ANNOUNCE_DELAY,
            guard_reduction: Self::DEFAULT_GUARD_REDUCTION,
            atb_mode: AtbMode::default(),
            status: StatusTuning::default(),
        }
    }

    pub fn with_announce_delay(mut self, seconds: f32) -> Self {
        self.announce_delay = seconds.max(0.0);
        self
    }

    pub fn with_guard_reduction(mut self, factor: f32) -> Self {
        self.guard_reduction = factor.max(0.0);
        self
    }

    pub fn with_gauge_max(mut self, gauge_max: f32) -> Self {
        self.gauge_max = gauge_max;
        self
    }

    pub fn with_atb_mode(mut self, mode: AtbMode) -> Self {
        self.atb_mode = mode;
        self
    }

    pub fn with_status_tuning(mut self, tuning: StatusTuning) -> Self {
        self.status = tuning;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
