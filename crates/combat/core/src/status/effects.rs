//! Per-combatant status storage.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::status::StatusKind;

/// One active status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedStatus {
    pub kind: StatusKind,
    /// Owner turns left; `None` for untimed markers.
    pub remaining: Option<u32>,
}

/// Active statuses on a combatant, at most one entry per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    entries: ArrayVec<AppliedStatus, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&AppliedStatus> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn remaining(&self, kind: StatusKind) -> Option<u32> {
        self.get(kind).and_then(|e| e.remaining)
    }

    /// Inserts or replaces the entry for `kind`.
    ///
    /// Returns true when the kind was already present.
    pub(crate) fn set(&mut self, kind: StatusKind, remaining: Option<u32>) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = remaining;
            return true;
        }
        // One slot per kind, so capacity is never exceeded.
        self.entries.push(AppliedStatus { kind, remaining });
        false
    }

    pub(crate) fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != kind);
        self.entries.len() != before
    }

    /// Decrements every timed entry; returns the kinds that reached zero.
    ///
    /// Expired entries stay in place so the caller can remove them through
    /// the status engine (which also resets multipliers).
    pub(crate) fn count_down(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for entry in self.entries.iter_mut() {
            if let Some(turns) = entry.remaining.as_mut() {
                *turns = turns.saturating_sub(1);
                if *turns == 0 {
                    expired.push(entry.kind);
                }
            }
        }
        expired
    }

    pub fn kinds(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.entries.iter().map(|e| e.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppliedStatus> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_instead_of_stacking() {
        let mut effects = StatusEffects::empty();
        assert!(!effects.set(StatusKind::Strength, Some(3)));
        assert!(effects.set(StatusKind::Strength, Some(1)));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.remaining(StatusKind::Strength), Some(1));
    }

    #[test]
    fn count_down_skips_untimed_markers() {
        let mut effects = StatusEffects::empty();
        effects.set(StatusKind::Guarded, None);
        effects.set(StatusKind::Tough, Some(2));
        assert!(effects.count_down().is_empty());
        assert_eq!(effects.count_down(), vec![StatusKind::Tough]);
        assert!(effects.has(StatusKind::Guarded));
    }
}
