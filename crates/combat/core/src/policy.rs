//! Enemy decision making.
//!
//! The engine asks the policy what an enemy does when its gauge fills. A
//! policy sees the acting enemy and the living party; the decision is
//! validated by the execution pipeline like any operator choice.

use tracing::debug;

use crate::action::{ActionKind, TargetSelection};
use crate::event::EventSink;
use crate::rng::{PcgRng, RngOracle};
use crate::state::Combatant;

/// Action and target chosen by an enemy policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyIntent {
    pub action: ActionKind,
    pub target: TargetSelection,
}

impl EnemyIntent {
    pub fn attack(target: &Combatant) -> Self {
        Self {
            action: ActionKind::Attack,
            target: TargetSelection::Single(target.id),
        }
    }
}

/// Chooses enemy actions. `None` passes the turn.
pub trait EnemyPolicy: Send {
    fn decide(
        &mut self,
        actor: &Combatant,
        party: &[&Combatant],
        sink: &mut dyn EventSink,
    ) -> Option<EnemyIntent>;
}

/// Attacks the first living party member.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstTargetPolicy;

impl EnemyPolicy for FirstTargetPolicy {
    fn decide(
        &mut self,
        _actor: &Combatant,
        party: &[&Combatant],
        _sink: &mut dyn EventSink,
    ) -> Option<EnemyIntent> {
        party.first().map(|target| EnemyIntent::attack(target))
    }
}

/// Uses a random known skill (or a basic attack) on a random party member.
///
/// Reproducible for a given seed.
#[derive(Clone, Debug)]
pub struct RandomTargetPolicy {
    rng: PcgRng,
    state: u64,
}

impl RandomTargetPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: PcgRng,
            state: seed,
        }
    }

    fn roll(&mut self, len: usize) -> usize {
        self.state = self.state.wrapping_add(1);
        self.rng.pick(self.state, len)
    }
}

impl EnemyPolicy for RandomTargetPolicy {
    fn decide(
        &mut self,
        actor: &Combatant,
        party: &[&Combatant],
        _sink: &mut dyn EventSink,
    ) -> Option<EnemyIntent> {
        if party.is_empty() {
            return None;
        }
        let target = party[self.roll(party.len())];

        // Index 0 is the basic attack; skills follow.
        let choice = self.roll(actor.skills().len() + 1);
        let action = match choice.checked_sub(1) {
            Some(skill) => ActionKind::Skill(skill),
            None => ActionKind::Attack,
        };
        debug!(
            target: "combat::policy",
            actor = %actor.name,
            target = %target.name,
            ?action,
            "enemy decided"
        );

        Some(EnemyIntent {
            action,
            target: TargetSelection::Single(target.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NullSink;
    use crate::state::{CombatantId, CombatantTemplate, Roster, Side};

    fn roster() -> Roster {
        Roster::new(
            vec![
                CombatantTemplate::ally("A", 10, 10),
                CombatantTemplate::ally("B", 10, 10),
                CombatantTemplate::ally("C", 10, 10),
            ],
            vec![CombatantTemplate::enemy("Wolf", 10)],
            100.0,
        )
        .unwrap()
    }

    #[test]
    fn first_target_picks_the_front_of_the_party() {
        let roster = roster();
        let party: Vec<_> = roster.living(Side::Ally).collect();
        let wolf = roster.get(CombatantId(3)).unwrap();

        let intent = FirstTargetPolicy.decide(wolf, &party, &mut NullSink).unwrap();

        assert_eq!(intent, EnemyIntent::attack(party[0]));
        assert_eq!(FirstTargetPolicy.decide(wolf, &[], &mut NullSink), None);
    }

    #[test]
    fn random_policy_is_reproducible_and_in_range() {
        let roster = roster();
        let party: Vec<_> = roster.living(Side::Ally).collect();
        let wolf = roster.get(CombatantId(3)).unwrap();
        let mut first = RandomTargetPolicy::new(99);
        let mut second = RandomTargetPolicy::new(99);

        for _ in 0..16 {
            let a = first.decide(wolf, &party, &mut NullSink).unwrap();
            let b = second.decide(wolf, &party, &mut NullSink).unwrap();
            assert_eq!(a, b);
            assert_eq!(a.action, ActionKind::Attack);
            let TargetSelection::Single(id) = a.target else {
                panic!("single target expected");
            };
            assert!(id.0 < 3);
        }
    }
}
