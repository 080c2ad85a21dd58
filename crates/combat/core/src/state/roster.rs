//! Ordered set of every combatant in one battle.

use crate::config::CombatConfig;
use crate::state::{Combatant, CombatantId, CombatantTemplate, Side, StateError};

/// All combatants, allies first, indexed by [`CombatantId`].
///
/// Iteration order is roster order, which is also the scheduler's tie-break
/// order when several gauges fill in the same tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    /// Builds the roster, assigning ids in order (allies, then enemies).
    ///
    /// Each template's `side` is overwritten by the list it arrives in.
    pub fn new(
        allies: Vec<CombatantTemplate>,
        enemies: Vec<CombatantTemplate>,
        gauge_max: f32,
    ) -> Result<Self, StateError> {
        if allies.is_empty() {
            return Err(StateError::EmptySide { side: Side::Ally });
        }
        if enemies.is_empty() {
            return Err(StateError::EmptySide { side: Side::Enemy });
        }
        if allies.len() > CombatConfig::MAX_PARTY_SIZE {
            return Err(StateError::RosterFull {
                side: Side::Ally,
                max: CombatConfig::MAX_PARTY_SIZE,
            });
        }
        if enemies.len() > CombatConfig::MAX_ENEMIES {
            return Err(StateError::RosterFull {
                side: Side::Enemy,
                max: CombatConfig::MAX_ENEMIES,
            });
        }

        let tagged = allies
            .into_iter()
            .map(|t| (Side::Ally, t))
            .chain(enemies.into_iter().map(|t| (Side::Enemy, t)));

        let mut combatants = Vec::new();
        for (index, (side, mut template)) in tagged.enumerate() {
            template.side = side;
            let id = CombatantId(index as u32);
            combatants.push(Combatant::from_template(id, template, gauge_max)?);
        }

        Ok(Self { combatants })
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.index())
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.index())
    }

    /// Mutable access to two distinct combatants at once.
    pub fn pair_mut(
        &mut self,
        a: CombatantId,
        b: CombatantId,
    ) -> Option<(&mut Combatant, &mut Combatant)> {
        let (ai, bi) = (a.index(), b.index());
        if ai == bi || ai >= self.combatants.len() || bi >= self.combatants.len() {
            return None;
        }
        if ai < bi {
            let (left, right) = self.combatants.split_at_mut(bi);
            Some((&mut left[ai], &mut right[0]))
        } else {
            let (left, right) = self.combatants.split_at_mut(ai);
            Some((&mut right[0], &mut left[bi]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    /// Living, non-inert combatants of `side`, in roster order.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.is_alive() && !c.is_inert())
    }

    pub fn living_ids(&self, side: Side) -> Vec<CombatantId> {
        self.living(side).map(|c| c.id).collect()
    }

    /// True once every member of `side` is dead.
    pub fn is_defeated(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(|c| c.is_alive() && !c.is_inert())
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(
            vec![
                CombatantTemplate::ally("Mira", 100, 40),
                CombatantTemplate::ally("Oren", 80, 30),
            ],
            vec![CombatantTemplate::enemy("Imp", 30)],
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn ids_follow_roster_order() {
        let roster = roster();
        let names: Vec<_> = roster.iter().map(|c| (c.id, c.name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                (CombatantId(0), "Mira"),
                (CombatantId(1), "Oren"),
                (CombatantId(2), "Imp")
            ]
        );
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut roster = roster();
        let (imp, mira) = roster.pair_mut(CombatantId(2), CombatantId(0)).unwrap();
        assert_eq!(imp.name, "Imp");
        assert_eq!(mira.name, "Mira");
        assert!(roster.pair_mut(CombatantId(1), CombatantId(1)).is_none());
    }

    #[test]
    fn dead_members_leave_living_set() {
        let mut roster = roster();
        roster.get_mut(CombatantId(2)).unwrap().take_damage(30);
        assert!(roster.is_defeated(Side::Enemy));
        assert_eq!(roster.living_ids(Side::Ally).len(), 2);
    }

    #[test]
    fn empty_side_is_rejected() {
        let err = Roster::new(vec![CombatantTemplate::ally("Mira", 1, 1)], vec![], 100.0)
            .unwrap_err();
        assert_eq!(err, StateError::EmptySide { side: Side::Enemy });
    }
}
