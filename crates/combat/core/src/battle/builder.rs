use crate::battle::Battle;
use crate::config::CombatConfig;
use crate::policy::{EnemyPolicy, FirstTargetPolicy};
use crate::state::{CombatantTemplate, ItemPool, Roster, StateError};

/// Assembles a [`Battle`] from explicit parts.
pub struct BattleBuilder {
    config: CombatConfig,
    allies: Vec<CombatantTemplate>,
    enemies: Vec<CombatantTemplate>,
    items: ItemPool,
    policy: Option<Box<dyn EnemyPolicy>>,
    seed: u64,
}

impl BattleBuilder {
    pub fn new() -> Self {
        Self {
            config: CombatConfig::default(),
            allies: Vec::new(),
            enemies: Vec::new(),
            items: ItemPool::new(),
            policy: None,
            seed: 0,
        }
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ally(mut self, template: CombatantTemplate) -> Self {
        self.allies.push(template);
        self
    }

    pub fn allies(mut self, templates: impl IntoIterator<Item = CombatantTemplate>) -> Self {
        self.allies.extend(templates);
        self
    }

    pub fn enemy(mut self, template: CombatantTemplate) -> Self {
        self.enemies.push(template);
        self
    }

    pub fn enemies(mut self, templates: impl IntoIterator<Item = CombatantTemplate>) -> Self {
        self.enemies.extend(templates);
        self
    }

    pub fn items(mut self, items: ItemPool) -> Self {
        self.items = items;
        self
    }

    /// Defaults to [`FirstTargetPolicy`].
    pub fn enemy_policy(mut self, policy: impl EnemyPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<Battle, StateError> {
        let roster = Roster::new(self.allies, self.enemies, self.config.gauge_max)?;
        let policy = self
            .policy
            .unwrap_or_else(|| Box::new(FirstTargetPolicy));
        Ok(Battle::new(self.config, roster, self.items, policy, self.seed))
    }
}

impl Default for BattleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
