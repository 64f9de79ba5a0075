//! Content factory for building the arena content bundle from data files.

use std::path::{Path, PathBuf};

use arena_core::{ArchetypeTemplate, GameConfig, ItemTemplate, SkillTemplate, TemplateRegistry};
use tracing::info;

use crate::Content;
use crate::loaders::{
    ArchetypeLoader, ConfigLoader, ItemLoader, LoadResult, SkillLoader, SpawnLoader,
};

/// Content factory that loads all arena content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml      (optional)
/// ├── items.ron
/// ├── skills.ron
/// ├── archetypes.ron
/// └── spawns.ron
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

    /// Load game configuration from `config.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemTemplate>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillTemplate>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load archetypes from `archetypes.ron`.
    pub fn load_archetypes(&self) -> LoadResult<Vec<ArchetypeTemplate>> {
        ArchetypeLoader::load(&self.data_dir.join("archetypes.ron"))
    }

    /// Load items, skills, and archetypes into a validated registry.
    ///
    /// Fails on duplicate template names and on archetypes that reference
    /// unknown skills.
    pub fn load_registry(&self) -> LoadResult<TemplateRegistry> {
        let mut registry = TemplateRegistry::new();
        for item in self.load_items()? {
            registry.add_item(item)?;
        }
        for skill in self.load_skills()? {
            registry.add_skill(skill)?;
        }
        for archetype in self.load_archetypes()? {
            registry.add_archetype(archetype)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Load everything into a [`Content`] bundle.
    pub fn load(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let registry = self.load_registry()?;
        let spawns = SpawnLoader::load(&self.data_dir.join("spawns.ron"))?;

        info!(
            dir = %self.data_dir.display(),
            items = registry.item_count(),
            skills = registry.skill_count(),
            archetypes = registry.archetype_count(),
            spawn_points = spawns.len(),
            "content loaded"
        );
        Ok(Content::new(config, registry, spawns))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use arena_core::{
        ArchetypeOracle, EntityKind, ItemOracle, Position, SkillEffect, SkillOracle,
        SpawnDirectory, Team,
    };
    use tempfile::TempDir;

    use super::*;

    const ITEMS: &str = r#"(
        items: [
            (
                name: "health_potion",
                category: Consumable,
                max_stack: 20,
                restores_health: 50,
                consume_on_use: true,
            ),
            (
                name: "iron_sword",
                category: Equipment,
                max_stack: 1,
                bonus: (damage: 5),
            ),
        ],
    )"#;

    const SKILLS: &str = r#"(
        skills: [
            (
                name: "slash",
                effect: Damage(amount: (base: 8, per_level: 2)),
                cast_range: (base: 2.5),
                cast_time_ms: (base: 500),
                followup_default_attack: true,
            ),
            (
                name: "mend",
                effect: Heal(health: (base: 30), mana: (base: 0)),
                max_level: 3,
                cast_range: (base: 6.0),
            ),
        ],
    )"#;

    const ARCHETYPES: &str = r#"(
        archetypes: [
            (
                name: "warrior",
                kind: Player,
                base: (
                    health: (base: 120, per_level: 12),
                    mana: (base: 30, per_level: 3),
                    damage: (base: 10, per_level: 2),
                    block_chance: 10,
                ),
                skills: ["slash", "mend"],
            ),
            (
                name: "goblin",
                kind: Monster,
                base: (health: (base: 40)),
                skills: ["slash"],
                kill_reward: (experience: 60, gold: 12),
            ),
        ],
    )"#;

    const SPAWNS: &str = r#"(
        spawns: [
            (team: Team(1), position: (x: 0.0, y: 0.0, z: 0.0)),
            (team: Team(2), position: (x: 20.0, y: 0.0, z: 5.0)),
        ],
    )"#;

    fn write_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn full_dir() -> TempDir {
        write_dir(&[
            ("items.ron", ITEMS),
            ("skills.ron", SKILLS),
            ("archetypes.ron", ARCHETYPES),
            ("spawns.ron", SPAWNS),
            ("config.toml", "inventory_capacity = 16\n"),
        ])
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_complete_directory() {
        let dir = full_dir();
        let content = ContentFactory::new(dir.path()).load().unwrap();

        assert_eq!(content.config.inventory_capacity, 16);
        assert_eq!(content.registry.item_count(), 2);
        assert_eq!(content.registry.skill_count(), 2);
        assert_eq!(content.registry.archetype_count(), 2);

        let sword = content.registry.item("iron_sword").unwrap();
        assert_eq!(sword.bonus.damage, 5);
        let potion = content.registry.item("health_potion").unwrap();
        assert!(potion.category.is_consumable());
        assert!(potion.consume_on_use);

        let slash = content.registry.skill("slash").unwrap();
        assert!(matches!(slash.effect, SkillEffect::Damage { .. }));
        assert_eq!(slash.max_level, 1);
        assert_eq!(slash.cast_time_at(1), 500);
        assert!(slash.followup_default_attack);
        assert_eq!(content.registry.skill("mend").unwrap().max_level, 3);

        let warrior = content.registry.archetype("warrior").unwrap();
        assert_eq!(warrior.kind, EntityKind::Player);
        assert_eq!(warrior.base.health.get(3), 144);
        assert!(warrior.respawns);
        assert_eq!(warrior.move_speed, ArchetypeTemplate::DEFAULT_MOVE_SPEED);
        assert_eq!(
            content.registry.archetype("goblin").unwrap().kill_reward.gold,
            12
        );

        assert_eq!(
            content.spawns.spawn_point(Team(2)),
            Some(Position::new(20.0, 0.0, 5.0))
        );
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = write_dir(&[
            ("items.ron", ITEMS),
            ("skills.ron", SKILLS),
            ("archetypes.ron", ARCHETYPES),
            ("spawns.ron", SPAWNS),
        ]);
        let content = ContentFactory::new(dir.path()).load().unwrap();
        assert_eq!(content.config, GameConfig::default());
    }

    #[test]
    fn rejects_archetype_with_unknown_skill() {
        let archetypes = ARCHETYPES.replace("[\"slash\"]", "[\"slash\", \"meteor\"]");
        let dir = write_dir(&[
            ("items.ron", ITEMS),
            ("skills.ron", SKILLS),
            ("archetypes.ron", &archetypes),
            ("spawns.ron", SPAWNS),
        ]);
        let err = ContentFactory::new(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("meteor"), "{err}");
    }

    #[test]
    fn rejects_duplicate_template_names() {
        let items = ITEMS.replace("iron_sword", "health_potion");
        let dir = write_dir(&[
            ("items.ron", &items),
            ("skills.ron", SKILLS),
            ("archetypes.ron", ARCHETYPES),
            ("spawns.ron", SPAWNS),
        ]);
        assert!(ContentFactory::new(dir.path()).load_registry().is_err());
    }

    #[test]
    fn reports_missing_files() {
        let dir = write_dir(&[("items.ron", ITEMS)]);
        let err = ContentFactory::new(dir.path()).load().unwrap_err();
        assert!(err.to_string().contains("skills.ron"), "{err}");
    }

    #[test]
    fn shipped_arena_data_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data/arena");
        let content = ContentFactory::new(dir).load().unwrap();
        assert!(content.registry.archetype_count() > 0);
        assert!(content.spawns.spawn_point(Team(1)).is_some());
        assert!(content.spawns.spawn_point(Team(2)).is_some());
    }
}
