//! Authoritative arena combat rules and data types.
//!
//! `arena-core` defines the canonical rules (stats, inventories, skills, the
//! per-entity state machine, and combat resolution) as pure APIs with no
//! I/O. All state mutation flows through [`engine::GameEngine`]; the runtime
//! crate drives it on a fixed tick and supporting crates depend on the types
//! re-exported here.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod nav;
pub mod state;
pub mod stats;

pub use combat::{CastError, CastTarget, Reach, calculate_damage};
pub use config::GameConfig;
pub use engine::{CommandError, GameEngine, SpawnError};
pub use env::{
    ArchetypeOracle, ArchetypeTemplate, GameEnv, ItemCategory, ItemOracle, ItemTemplate,
    OracleError, PcgRng, RngOracle, SkillEffect, SkillOracle, SkillTemplate, SpawnDirectory,
    SpawnPoints, Targeting, TemplateRegistry,
};
pub use error::{ErrorSeverity, GameError};
pub use event::{ArenaEvent, HitKind};
pub use nav::{LinearNavigator, Navigator};
pub use state::{
    ArenaState, Buff, Capabilities, ClientCommand, Entity, EntityId, EntityKind, EntitySnapshot,
    EntityState, Inventory, InventoryError, ItemStack, PlayerData, Position, SkillError,
    SkillInstance, SkillSet, SlotSnapshot, Team, Timestamp,
};
pub use stats::{BaseStats, EffectiveStats, ExperienceCurve, LinearStat, Reward, StatBonus};
