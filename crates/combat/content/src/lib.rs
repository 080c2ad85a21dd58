//! Data-driven combat content and loaders.
//!
//! Content lives in RON/TOML files:
//! - Party archetypes with their skills (`archetypes.ron`)
//! - Enemy templates and named encounters (`enemies.ron`)
//! - Starting inventory (`items.ron`)
//! - Combat tuning (`config.toml`)
//!
//! Every loader deserializes straight into combat-core types. A default
//! content set is embedded in the binary for tests and the headless client.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArchetypeLoader, Bestiary, CombatContent, ConfigLoader, ContentFactory, EncounterSpec,
    EnemyLoader, ItemLoader, LoadResult, PartyCatalog,
};
