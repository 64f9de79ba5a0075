//! Everything an arena needs besides its live state.

use arena_core::{GameConfig, GameEnv, RngOracle, SpawnPoints, TemplateRegistry};

/// Loaded templates, spawn directory, and tunables.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub config: GameConfig,
    pub registry: TemplateRegistry,
    pub spawns: SpawnPoints,
}

impl Content {
    pub fn new(config: GameConfig, registry: TemplateRegistry, spawns: SpawnPoints) -> Self {
        Self {
            config,
            registry,
            spawns,
        }
    }

    /// Engine environment backed by this content.
    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle) -> GameEnv<'a> {
        GameEnv::from_registry(&self.registry, &self.spawns, rng, &self.config)
    }
}
