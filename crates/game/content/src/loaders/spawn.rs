//! Spawn directory loader.

use std::path::Path;

use arena_core::{Position, SpawnDirectory, SpawnPoints, Team};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::loaders::{LoadResult, read_file};

/// One team's entry point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub team: Team,
    pub position: Position,
}

/// Spawn directory structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnCatalog {
    pub spawns: Vec<SpawnSpec>,
}

/// Loader for team spawn points from RON files.
pub struct SpawnLoader;

impl SpawnLoader {
    /// Load spawn points. A team listed twice keeps its last position.
    pub fn load(path: &Path) -> LoadResult<SpawnPoints> {
        let content = read_file(path)?;
        let catalog: SpawnCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spawn RON: {}", e))?;

        let mut points = SpawnPoints::new();
        for spec in catalog.spawns {
            if points.spawn_point(spec.team).is_some() {
                warn!(team = %spec.team, "duplicate spawn point, keeping the last one");
            }
            points.insert(spec.team, spec.position);
        }
        Ok(points)
    }
}
