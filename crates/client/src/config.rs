//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENCOUNTER: &str = "Crypt Gate";
pub const DEFAULT_PARTY: [&str; 3] = ["Warden", "Occultist", "Duelist"];

/// Configuration required to run one headless battle.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Content directory; embedded content is used when unset.
    pub data_dir: Option<PathBuf>,
    pub seed: u64,
    pub tick_interval: Duration,
    /// Battle seconds per wall-clock second.
    pub time_scale: f32,
    pub max_ticks: Option<u64>,
    pub encounter: String,
    pub party: Vec<String>,
    /// Also write logs to `combat.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed: 0,
            tick_interval: Duration::from_millis(50),
            time_scale: 1.0,
            max_ticks: None,
            encounter: DEFAULT_ENCOUNTER.to_owned(),
            party: DEFAULT_PARTY.iter().map(|s| (*s).to_owned()).collect(),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - Content directory (default: embedded content)
    /// - `COMBAT_SEED` - Battle and enemy policy seed (default: 0)
    /// - `COMBAT_TICK_MS` - Milliseconds between ticks (default: 50)
    /// - `COMBAT_TIME_SCALE` - Battle speed multiplier (default: 1.0)
    /// - `COMBAT_MAX_TICKS` - Abort after this many ticks (default: unlimited)
    /// - `COMBAT_ENCOUNTER` - Encounter name (default: "Crypt Gate")
    /// - `COMBAT_PARTY` - Comma-separated archetype names
    /// - `COMBAT_LOG_DIR` - Directory for a log file (default: stderr only)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.data_dir = lookup("COMBAT_DATA_DIR").map(PathBuf::from);

        if let Some(seed) = parse(&lookup, "COMBAT_SEED") {
            config.seed = seed;
        }

        if let Some(ms) = parse::<u64>(&lookup, "COMBAT_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms.max(1));
        }

        if let Some(scale) = parse::<f32>(&lookup, "COMBAT_TIME_SCALE")
            && scale.is_finite()
            && scale > 0.0
        {
            config.time_scale = scale;
        }

        config.max_ticks = parse(&lookup, "COMBAT_MAX_TICKS");

        if let Some(encounter) = lookup("COMBAT_ENCOUNTER").filter(|s| !s.trim().is_empty()) {
            config.encounter = encounter.trim().to_owned();
        }

        if let Some(party) = lookup("COMBAT_PARTY") {
            let names: Vec<String> = party
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
            if !names.is_empty() {
                config.party = names;
            }
        }

        config.log_dir = lookup("COMBAT_LOG_DIR").map(PathBuf::from);

        config
    }

    /// Battle seconds advanced per tick.
    pub fn time_step(&self) -> f32 {
        self.tick_interval.as_secs_f32() * self.time_scale
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
