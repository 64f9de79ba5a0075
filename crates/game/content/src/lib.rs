//! Data-driven arena content.
//!
//! This crate loads the static content an arena runs on from RON/TOML data
//! files:
//! - Item catalog (RON)
//! - Skill catalog (RON)
//! - Archetypes (RON)
//! - Team spawn points (RON)
//! - Game configuration (TOML)
//!
//! Content is consumed through the `arena-core` oracles and never appears in
//! arena state.

pub mod bundle;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::Content;

#[cfg(feature = "loaders")]
pub use loaders::{
    ArchetypeLoader, ConfigLoader, ContentFactory, ItemLoader, SkillLoader, SpawnLoader,
};
