//! Enemy templates and encounter tables.

use std::path::Path;

use combat_core::{CombatConfig, CombatantTemplate, Side};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file, validate_templates};

/// Named enemy group referencing templates by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub name: String,
    pub enemies: Vec<String>,
}

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bestiary {
    pub enemies: Vec<CombatantTemplate>,
    #[serde(default)]
    pub encounters: Vec<EncounterSpec>,
}

impl Bestiary {
    pub fn get(&self, name: &str) -> Option<&CombatantTemplate> {
        self.enemies.iter().find(|e| e.name == name)
    }

    /// Enemy templates for an encounter. Repeated enemies get numbered names.
    pub fn encounter(&self, name: &str) -> LoadResult<Vec<CombatantTemplate>> {
        let spec = self
            .encounters
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| anyhow::anyhow!("unknown encounter '{name}'"))?;

        let mut templates = Vec::with_capacity(spec.enemies.len());
        for (index, enemy) in spec.enemies.iter().enumerate() {
            let mut template = self
                .get(enemy)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("encounter '{name}' uses unknown enemy '{enemy}'"))?;
            let copies = spec.enemies.iter().filter(|e| *e == enemy).count();
            if copies > 1 {
                let nth = spec.enemies[..index].iter().filter(|e| *e == enemy).count();
                template.name = format!("{enemy} {}", letter(nth));
            }
            templates.push(template);
        }
        Ok(templates)
    }

    fn validate(&self) -> LoadResult<()> {
        validate_templates(&self.enemies, Side::Enemy, "enemies")?;
        for spec in &self.encounters {
            if spec.enemies.is_empty() {
                anyhow::bail!("encounter '{}' has no enemies", spec.name);
            }
            if spec.enemies.len() > CombatConfig::MAX_ENEMIES {
                anyhow::bail!(
                    "encounter '{}' has {} enemies (max {})",
                    spec.name,
                    spec.enemies.len(),
                    CombatConfig::MAX_ENEMIES
                );
            }
            if let Some(missing) = spec.enemies.iter().find(|e| self.get(e).is_none()) {
                anyhow::bail!("encounter '{}' uses unknown enemy '{missing}'", spec.name);
            }
        }
        Ok(())
    }
}

/// `A`, `B`, ... then `27`, `28`, ... past the alphabet.
fn letter(nth: usize) -> String {
    match u8::try_from(nth) {
        Ok(n) if n < 26 => char::from(b'A' + n).to_string(),
        _ => (nth + 1).to_string(),
    }
}

/// Loader for the bestiary from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path) -> LoadResult<Bestiary> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Bestiary> {
        let bestiary: Bestiary = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy RON: {}", e))?;
        bestiary.validate()?;
        Ok(bestiary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BESTIARY: &str = r#"(
        enemies: [
            (name: "Ghoul", side: Enemy, max_health: 40, action_speed: 8.0, attack_power: 9),
            (name: "Shade", side: Enemy, max_health: 25, action_speed: 14.0, attack_power: 6),
        ],
        encounters: [
            (name: "Crypt", enemies: ["Ghoul", "Shade", "Ghoul"]),
        ],
    )"#;

    #[test]
    fn repeated_enemies_get_letters() {
        let bestiary = EnemyLoader::parse(BESTIARY).unwrap();
        let names: Vec<_> = bestiary
            .encounter("Crypt")
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names, vec!["Ghoul A", "Shade", "Ghoul B"]);
    }

    #[test]
    fn encounter_with_unknown_enemy_is_rejected() {
        let broken = BESTIARY.replace("\"Shade\", \"Ghoul\"]", "\"Wraith\"]");
        let err = EnemyLoader::parse(&broken).unwrap_err();
        assert!(err.to_string().contains("Wraith"));
    }

    #[test]
    fn allies_in_the_bestiary_are_rejected() {
        let broken = BESTIARY.replace(
            "name: \"Shade\", side: Enemy",
            "name: \"Shade\", side: Ally",
        );
        assert!(EnemyLoader::parse(&broken).is_err());
    }
}
