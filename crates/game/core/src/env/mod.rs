//! Traits describing read-only content and external collaborators.
//!
//! Oracles expose item, skill, and archetype templates, the spawn directory,
//! and deterministic randomness. The [`GameEnv`] aggregate bundles them with
//! the [`GameConfig`] so the engine can reach everything it needs without
//! hard coupling to concrete implementations.
mod archetypes;
mod error;
mod items;
mod registry;
mod rng;
mod skills;
mod spawn;

pub use archetypes::{ArchetypeOracle, ArchetypeTemplate};
pub use error::OracleError;
pub use items::{ItemCategory, ItemOracle, ItemTemplate};
pub use registry::TemplateRegistry;
pub use rng::{PcgRng, RngOracle, RollKind, compute_seed};
pub use skills::{SkillEffect, SkillOracle, SkillTemplate, Targeting};
pub use spawn::{SpawnDirectory, SpawnPoints};

use crate::config::GameConfig;

/// Aggregates read-only oracles required by the engine.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    items: &'a dyn ItemOracle,
    skills: &'a dyn SkillOracle,
    archetypes: &'a dyn ArchetypeOracle,
    spawns: &'a dyn SpawnDirectory,
    rng: &'a dyn RngOracle,
    config: &'a GameConfig,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        items: &'a dyn ItemOracle,
        skills: &'a dyn SkillOracle,
        archetypes: &'a dyn ArchetypeOracle,
        spawns: &'a dyn SpawnDirectory,
        rng: &'a dyn RngOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self {
            items,
            skills,
            archetypes,
            spawns,
            rng,
            config,
        }
    }

    /// Environment backed by a single registry for all templates.
    pub fn from_registry(
        registry: &'a TemplateRegistry,
        spawns: &'a dyn SpawnDirectory,
        rng: &'a dyn RngOracle,
        config: &'a GameConfig,
    ) -> Self {
        Self::new(registry, registry, registry, spawns, rng, config)
    }

    pub fn items(&self) -> &'a dyn ItemOracle {
        self.items
    }

    pub fn skills(&self) -> &'a dyn SkillOracle {
        self.skills
    }

    pub fn archetypes(&self) -> &'a dyn ArchetypeOracle {
        self.archetypes
    }

    pub fn spawns(&self) -> &'a dyn SpawnDirectory {
        self.spawns
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }
}
