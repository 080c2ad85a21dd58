use std::fmt;

/// Identifier of a combatant inside one battle; equal to its roster index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the fight a combatant belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }
}

/// Integer resource meter (health, sanity) clamped to `0..=maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Removes up to `amount`; returns what was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    /// Adds up to `amount` without exceeding the maximum; returns the gain.
    pub fn fill(&mut self, amount: u32) -> u32 {
        let actual = amount.min(self.maximum - self.current);
        self.current += actual;
        actual
    }
}

/// Accumulator that grants a turn when it reaches `maximum`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionGauge {
    pub current: f32,
    pub maximum: f32,
}

impl ActionGauge {
    pub fn new(maximum: f32) -> Self {
        Self {
            current: 0.0,
            maximum,
        }
    }

    /// Adds `amount` (clamped at the maximum). Returns true once full.
    pub fn advance(&mut self, amount: f32) -> bool {
        if amount > 0.0 {
            self.current = (self.current + amount).min(self.maximum);
        }
        self.is_full()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
    }
}
