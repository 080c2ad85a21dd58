//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.gauge_max.is_nan() || config.gauge_max <= 0.0 {
            anyhow::bail!("gauge_max must be positive, got {}", config.gauge_max);
        }
        if config.announce_delay < 0.0 {
            anyhow::bail!("announce_delay must not be negative");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::AtbMode;

    #[test]
    fn partial_config_keeps_defaults() {
        let config =
            ConfigLoader::parse("atb_mode = \"Active\"\n[status]\nstrength = 2.0\n").unwrap();

        assert_eq!(config.atb_mode, AtbMode::Active);
        assert_eq!(config.status.strength, 2.0);
        assert_eq!(config.status.weakness, 0.5);
        assert_eq!(config.announce_delay, CombatConfig::DEFAULT_ANNOUNCE_DELAY);
    }

    #[test]
    fn non_positive_gauge_is_rejected() {
        assert!(ConfigLoader::parse("gauge_max = 0.0").is_err());
    }
}
