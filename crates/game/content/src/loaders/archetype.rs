//! Archetype loader.

use std::path::Path;

use arena_core::ArchetypeTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Archetype list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeCatalog {
    pub archetypes: Vec<ArchetypeTemplate>,
}

/// Loader for spawnable archetypes from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ArchetypeTemplate>> {
        let content = read_file(path)?;
        let catalog: ArchetypeCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetype RON: {}", e))?;

        Ok(catalog.archetypes)
    }
}
