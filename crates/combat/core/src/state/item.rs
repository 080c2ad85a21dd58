//! Party inventory shared by every ally.

use crate::action::{Effect, TargetPolicy};
use crate::state::StateError;

/// Whether an item may be used in combat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    #[default]
    Consumable,
    /// Story items; never listed or usable in combat.
    KeyItem,
}

/// Item stack with its remaining amount.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub description: String,
    pub amount: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ItemCategory,
    pub targeting: TargetPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<Effect>,
}

impl Item {
    pub fn consumable(
        name: impl Into<String>,
        description: impl Into<String>,
        amount: u32,
        targeting: TargetPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            amount,
            category: ItemCategory::Consumable,
            targeting,
            effects: Vec::new(),
        }
    }

    pub fn key_item(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            amount: 1,
            category: ItemCategory::KeyItem,
            targeting: TargetPolicy::SelfOnly,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Consumable with at least one use left.
    pub fn is_usable_in_combat(&self) -> bool {
        self.category == ItemCategory::Consumable && self.amount > 0
    }

    pub fn requires_target(&self) -> bool {
        self.targeting.requires_target()
    }
}

/// Shared, ordered item pool. Stacks are merged by name and removed at zero.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPool {
    items: Vec<Item>,
}

impl ItemPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut pool = Self::new();
        for item in items {
            pool.add(item);
        }
        pool
    }

    /// Adds a stack, merging amounts with an existing stack of the same name.
    pub fn add(&mut self, item: Item) {
        if item.amount == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.name == item.name) {
            Some(existing) => existing.amount = existing.amount.saturating_add(item.amount),
            None => self.items.push(item),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn amount(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |i| i.amount)
    }

    /// Items that appear in the combat menu, in pool order.
    pub fn combat_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.is_usable_in_combat())
    }

    /// Uses one unit of `name`. The stack disappears when it reaches zero.
    ///
    /// Returns the remaining amount.
    pub fn consume(&mut self, name: &str) -> Result<u32, StateError> {
        let index = self
            .items
            .iter()
            .position(|i| i.name == name)
            .ok_or_else(|| StateError::UnknownItem(name.to_string()))?;

        let item = &mut self.items[index];
        if item.amount == 0 {
            return Err(StateError::ItemDepleted(name.to_string()));
        }
        item.amount -= 1;
        let remaining = item.amount;
        if remaining == 0 {
            self.items.remove(index);
        }
        Ok(remaining)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}
