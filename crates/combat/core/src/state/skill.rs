use crate::action::{Effect, TargetPolicy};

/// Named technique a combatant can use, paid for with sanity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sanity_cost: u32,
    pub targeting: TargetPolicy,
    /// Applied in phase order; see [`Effect::phase`].
    pub effects: Vec<Effect>,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        sanity_cost: u32,
        targeting: TargetPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            sanity_cost,
            targeting,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// True when the operator must pick (or confirm) targets before use.
    pub fn requires_target(&self) -> bool {
        self.targeting.requires_target()
    }
}
