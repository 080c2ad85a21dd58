//! Content loaders for reading combat data from files.

pub mod archetypes;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod items;

pub use archetypes::{ArchetypeLoader, PartyCatalog};
pub use config::ConfigLoader;
pub use enemies::{Bestiary, EncounterSpec, EnemyLoader};
pub use factory::{CombatContent, ContentFactory};
pub use items::ItemLoader;

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use combat_core::{CombatantTemplate, Side};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read file {}", path.display()))
}

/// Rejects duplicate names and templates filed under the wrong side.
pub(crate) fn validate_templates(
    templates: &[CombatantTemplate],
    side: Side,
    source: &str,
) -> LoadResult<()> {
    let mut seen = HashSet::new();
    for template in templates {
        if template.side != side {
            anyhow::bail!(
                "{source}: '{}' is declared as {} but listed with {side} templates",
                template.name,
                template.side
            );
        }
        if !seen.insert(template.name.as_str()) {
            anyhow::bail!("{source}: duplicate template '{}'", template.name);
        }
    }
    Ok(())
}
