/// Stat a status effect scales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifiedStat {
    /// Outgoing damage.
    Attack,
    /// Incoming damage (higher = more damage taken).
    Defense,
    /// Action-gauge fill rate.
    Speed,
}

/// Kinds of status effects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Attack
    // ========================================================================
    Strength,
    Weakness,

    // ========================================================================
    // Defense
    // ========================================================================
    /// Halves damage taken.
    Tough,
    /// Damage taken ×1.5.
    Vulnerable,

    // ========================================================================
    // Speed
    // ========================================================================
    Agile,
    Slowed,

    // ========================================================================
    // Relationship marker
    // ========================================================================
    /// Another combatant intercepts damage aimed at this one. Untimed.
    Guarded,
}

impl StatusKind {
    /// The kind this one cancels (and is cancelled by).
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Strength => Some(Self::Weakness),
            Self::Weakness => Some(Self::Strength),
            Self::Tough => Some(Self::Vulnerable),
            Self::Vulnerable => Some(Self::Tough),
            Self::Agile => Some(Self::Slowed),
            Self::Slowed => Some(Self::Agile),
            Self::Guarded => None,
        }
    }

    pub const fn stat(self) -> Option<ModifiedStat> {
        match self {
            Self::Strength | Self::Weakness => Some(ModifiedStat::Attack),
            Self::Tough | Self::Vulnerable => Some(ModifiedStat::Defense),
            Self::Agile | Self::Slowed => Some(ModifiedStat::Speed),
            Self::Guarded => None,
        }
    }

    /// Counts down at the end of the owner's turns.
    pub const fn is_timed(self) -> bool {
        !matches!(self, Self::Guarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn opposites_are_symmetric_and_share_a_stat() {
        for kind in StatusKind::iter() {
            if let Some(opposite) = kind.opposite() {
                assert_eq!(opposite.opposite(), Some(kind));
                assert_eq!(opposite.stat(), kind.stat());
                assert_ne!(opposite, kind);
            }
        }
    }

    #[test]
    fn only_guarded_is_untimed() {
        let untimed: Vec<_> = StatusKind::iter().filter(|k| !k.is_timed()).collect();
        assert_eq!(untimed, vec![StatusKind::Guarded]);
    }
}
