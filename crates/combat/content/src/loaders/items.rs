//! Item catalog loader.

use std::path::Path;

use combat_core::{Item, ItemPool};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}

/// Loader for the starting inventory from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemPool> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Stacks sharing a name are merged; empty stacks are dropped.
    pub fn parse(content: &str) -> LoadResult<ItemPool> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        let empty = catalog.items.iter().filter(|i| i.amount == 0).count();
        if empty > 0 {
            tracing::warn!(target: "content", empty, "ignoring empty item stacks");
        }
        Ok(ItemPool::from_items(catalog.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Effect, ItemCategory, TargetPolicy};

    #[test]
    fn stacks_merge_and_key_items_stay_out_of_combat() {
        let pool = ItemLoader::parse(
            r#"(items: [
                (name: "Tonic", description: "", amount: 2,
                 targeting: SingleAlly(include_self: true), effects: [Heal(amount: 30)]),
                (name: "Tonic", description: "", amount: 1,
                 targeting: SingleAlly(include_self: true), effects: [Heal(amount: 30)]),
                (name: "Lantern", description: "", amount: 1, category: KeyItem,
                 targeting: SelfOnly),
                (name: "Dust", description: "", amount: 0, targeting: AllEnemies),
            ])"#,
        )
        .unwrap();

        assert_eq!(pool.amount("Tonic"), 3);
        assert_eq!(pool.get("Tonic").unwrap().effects, vec![Effect::Heal { amount: 30 }]);
        assert_eq!(pool.get("Tonic").unwrap().targeting, TargetPolicy::single_ally());
        assert_eq!(pool.get("Lantern").unwrap().category, ItemCategory::KeyItem);
        assert!(pool.get("Dust").is_none());
        assert_eq!(pool.combat_items().count(), 1);
    }
}
