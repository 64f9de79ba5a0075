//! Content loaders for reading arena data from files.
//!
//! Templates and spawn points are RON, configuration is TOML. Every loader
//! deserializes straight into `arena-core` types.

pub mod archetype;
pub mod config;
pub mod factory;
pub mod item;
pub mod skill;
pub mod spawn;

pub use archetype::ArchetypeLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use skill::SkillLoader;
pub use spawn::SpawnLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
