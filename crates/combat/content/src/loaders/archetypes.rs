//! Party archetype loader.

use std::path::Path;

use combat_core::{CombatantTemplate, Side};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, validate_templates};

/// Archetype catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyCatalog {
    pub archetypes: Vec<CombatantTemplate>,
}

impl PartyCatalog {
    pub fn get(&self, name: &str) -> Option<&CombatantTemplate> {
        self.archetypes.iter().find(|a| a.name == name)
    }

    /// Templates for the named party members, in the given order.
    pub fn party<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> LoadResult<Vec<CombatantTemplate>> {
        names
            .into_iter()
            .map(|name| {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("unknown archetype '{name}'"))
            })
            .collect()
    }
}

/// Loader for party archetypes from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load(path: &Path) -> LoadResult<PartyCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PartyCatalog> {
        let catalog: PartyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype RON: {}", e))?;
        validate_templates(&catalog.archetypes, Side::Ally, "archetypes")?;
        Ok(catalog)
    }
}
