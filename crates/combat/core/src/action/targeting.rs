//! Target policies and the selections they produce.

use crate::action::ActionKind;
use crate::state::{Combatant, CombatantId, Roster};

/// Who an action may be aimed at, relative to the actor's side.
///
/// "Enemy" means the actor's opponents, so an enemy using `SingleEnemy`
/// targets the party.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetPolicy {
    #[default]
    SingleEnemy,
    SingleAlly {
        include_self: bool,
    },
    AllEnemies,
    WholeParty,
    /// Applies to the actor; never enters target selection.
    SelfOnly,
}

impl TargetPolicy {
    pub const fn single_enemy() -> Self {
        Self::SingleEnemy
    }

    /// Any living member of the actor's side, the actor included.
    pub const fn single_ally() -> Self {
        Self::SingleAlly { include_self: true }
    }

    /// Any living member of the actor's side except the actor.
    pub const fn other_ally() -> Self {
        Self::SingleAlly {
            include_self: false,
        }
    }

    pub const fn requires_target(&self) -> bool {
        !matches!(self, Self::SelfOnly)
    }

    /// Group policies select every candidate at once.
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::AllEnemies | Self::WholeParty)
    }

    /// Living, targetable combatants in roster order.
    pub fn candidates(&self, actor: &Combatant, roster: &Roster) -> Vec<CombatantId> {
        match self {
            Self::SingleEnemy | Self::AllEnemies => roster.living_ids(actor.side.opponent()),
            Self::WholeParty => roster.living_ids(actor.side),
            Self::SingleAlly { include_self } => roster
                .living(actor.side)
                .filter(|c| *include_self || c.id != actor.id)
                .map(|c| c.id)
                .collect(),
            Self::SelfOnly => {
                if actor.is_alive() && !actor.is_inert() {
                    vec![actor.id]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Full selection for policies that need no operator choice.
    pub fn auto_selection(&self, actor: &Combatant, roster: &Roster) -> Option<TargetSelection> {
        match self {
            Self::SelfOnly => Some(TargetSelection::Actor),
            Self::AllEnemies | Self::WholeParty => {
                let group = self.candidates(actor, roster);
                (!group.is_empty()).then_some(TargetSelection::Group(group))
            }
            Self::SingleEnemy | Self::SingleAlly { .. } => None,
        }
    }
}

/// Targets chosen for one action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSelection {
    /// The actor itself.
    Actor,
    Single(CombatantId),
    Group(Vec<CombatantId>),
}

impl TargetSelection {
    pub fn ids(&self, actor: CombatantId) -> Vec<CombatantId> {
        match self {
            Self::Actor => vec![actor],
            Self::Single(id) => vec![*id],
            Self::Group(ids) => ids.clone(),
        }
    }
}

/// An action with its targets, ready for the execution pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedAction {
    pub actor: CombatantId,
    pub kind: ActionKind,
    pub target: TargetSelection,
}

impl ResolvedAction {
    pub fn new(actor: CombatantId, kind: ActionKind, target: TargetSelection) -> Self {
        Self {
            actor,
            kind,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CombatantTemplate;

    fn roster() -> Roster {
        Roster::new(
            vec![
                CombatantTemplate::ally("A", 10, 10),
                CombatantTemplate::ally("B", 10, 10),
            ],
            vec![
                CombatantTemplate::enemy("X", 10),
                CombatantTemplate::enemy("Y", 10),
            ],
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn sides_are_relative_to_the_actor() {
        let roster = roster();
        let ally = roster.get(CombatantId(0)).unwrap();
        let enemy = roster.get(CombatantId(2)).unwrap();

        assert_eq!(
            TargetPolicy::SingleEnemy.candidates(ally, &roster),
            vec![CombatantId(2), CombatantId(3)]
        );
        assert_eq!(
            TargetPolicy::SingleEnemy.candidates(enemy, &roster),
            vec![CombatantId(0), CombatantId(1)]
        );
        assert_eq!(
            TargetPolicy::other_ally().candidates(ally, &roster),
            vec![CombatantId(1)]
        );
    }

    #[test]
    fn dead_combatants_are_not_candidates() {
        let mut roster = roster();
        roster.get_mut(CombatantId(2)).unwrap().take_damage(10);
        let ally = roster.get(CombatantId(0)).unwrap();

        assert_eq!(
            TargetPolicy::AllEnemies.auto_selection(ally, &roster),
            Some(TargetSelection::Group(vec![CombatantId(3)]))
        );
    }

    #[test]
    fn only_self_policy_skips_selection() {
        assert!(!TargetPolicy::SelfOnly.requires_target());
        assert!(TargetPolicy::WholeParty.requires_target());
        assert!(TargetPolicy::WholeParty.is_group());
        assert!(!TargetPolicy::single_ally().is_group());
    }
}
