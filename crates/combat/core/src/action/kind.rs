use crate::action::{Effect, RejectReason, TargetPolicy};
use crate::state::{Combatant, ItemCategory, ItemPool};

/// The operator's (or enemy policy's) choice for a turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    /// Basic strike using the actor's attack power.
    Attack,
    /// Enter guard stance until the next turn.
    Guard,
    /// Index into the actor's skill list.
    Skill(usize),
    /// Item from the shared pool, by name.
    UseItem(String),
}

/// Everything the pipeline needs to know about an action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionProfile {
    pub kind: ActionKind,
    pub name: String,
    pub sanity_cost: u32,
    /// Item consumed on completion.
    pub item: Option<String>,
    pub targeting: TargetPolicy,
    pub effects: Vec<Effect>,
}

impl ActionProfile {
    /// Looks up the actor's skill or the pool's item behind `kind`.
    pub fn resolve(
        kind: &ActionKind,
        actor: &Combatant,
        items: &ItemPool,
    ) -> Result<Self, RejectReason> {
        let profile = match kind {
            ActionKind::Attack => Self {
                kind: kind.clone(),
                name: "Attack".to_owned(),
                sanity_cost: 0,
                item: None,
                targeting: TargetPolicy::SingleEnemy,
                effects: vec![Effect::damage(actor.attack_power)],
            },
            ActionKind::Guard => Self {
                kind: kind.clone(),
                name: "Guard".to_owned(),
                sanity_cost: 0,
                item: None,
                targeting: TargetPolicy::SelfOnly,
                effects: vec![Effect::GuardStance],
            },
            ActionKind::Skill(index) => {
                let skill = actor.skill(*index).ok_or(RejectReason::UnknownSkill)?;
                Self {
                    kind: kind.clone(),
                    name: skill.name.clone(),
                    sanity_cost: skill.sanity_cost,
                    item: None,
                    targeting: skill.targeting,
                    effects: skill.effects.clone(),
                }
            }
            ActionKind::UseItem(name) => {
                let item = items.get(name).ok_or(RejectReason::ItemUnavailable)?;
                if item.category == ItemCategory::KeyItem {
                    return Err(RejectReason::KeyItem);
                }
                if item.amount == 0 {
                    return Err(RejectReason::ItemUnavailable);
                }
                Self {
                    kind: kind.clone(),
                    name: item.name.clone(),
                    sanity_cost: 0,
                    item: Some(item.name.clone()),
                    targeting: item.targeting,
                    effects: item.effects.clone(),
                }
            }
        };
        Ok(profile)
    }

    /// Text shown while the action is announced.
    pub fn announcement(&self, actor_name: &str) -> String {
        match self.kind {
            ActionKind::Attack => format!("{actor_name} attacks!"),
            ActionKind::Guard => format!("{actor_name} is on guard."),
            ActionKind::Skill(_) | ActionKind::UseItem(_) => {
                format!("{actor_name} uses {}!", self.name)
            }
        }
    }
}
