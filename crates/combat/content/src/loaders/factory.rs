//! Content factory for loading a full content set.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, ItemPool};
use tracing::info;

use crate::loaders::{
    ArchetypeLoader, Bestiary, ConfigLoader, EnemyLoader, ItemLoader, LoadResult, PartyCatalog,
};

/// Everything needed to set up battles.
#[derive(Debug, Clone)]
pub struct CombatContent {
    pub config: CombatConfig,
    pub party: PartyCatalog,
    pub bestiary: Bestiary,
    pub items: ItemPool,
}

impl CombatContent {
    /// Default content compiled into the crate.
    pub fn embedded() -> LoadResult<Self> {
        Ok(Self {
            config: ConfigLoader::parse(include_str!("../../data/config.toml"))?,
            party: ArchetypeLoader::parse(include_str!("../../data/archetypes.ron"))?,
            bestiary: EnemyLoader::parse(include_str!("../../data/enemies.ron"))?,
            items: ItemLoader::parse(include_str!("../../data/items.ron"))?,
        })
    }
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── archetypes.ron
/// ├── enemies.ron
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load party archetypes from `archetypes.ron`.
    pub fn load_party(&self) -> LoadResult<PartyCatalog> {
        ArchetypeLoader::load(&self.data_dir.join("archetypes.ron"))
    }

    /// Load enemies and encounters from `enemies.ron`.
    pub fn load_bestiary(&self) -> LoadResult<Bestiary> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load the starting inventory from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemPool> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_all(&self) -> LoadResult<CombatContent> {
        let content = CombatContent {
            config: self.load_config()?,
            party: self.load_party()?,
            bestiary: self.load_bestiary()?,
            items: self.load_items()?,
        };
        info!(
            target: "content",
            dir = %self.data_dir.display(),
            archetypes = content.party.archetypes.len(),
            enemies = content.bestiary.enemies.len(),
            encounters = content.bestiary.encounters.len(),
            items = content.items.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
