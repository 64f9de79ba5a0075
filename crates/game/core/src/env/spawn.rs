use std::collections::HashMap;

use crate::state::{Position, Team};

/// Spawn directory: where a team enters the arena.
///
/// Used on initial spawn and on every respawn.
pub trait SpawnDirectory: Send + Sync {
    fn spawn_point(&self, team: Team) -> Option<Position>;
}

/// Fixed spawn point per team.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnPoints {
    points: HashMap<Team, Position>,
}

impl SpawnPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, team: Team, position: Position) {
        self.points.insert(team, position);
    }

    pub fn with(mut self, team: Team, position: Position) -> Self {
        self.insert(team, position);
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(Team, Position)> for SpawnPoints {
    fn from_iter<T: IntoIterator<Item = (Team, Position)>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl SpawnDirectory for SpawnPoints {
    fn spawn_point(&self, team: Team) -> Option<Position> {
        self.points.get(&team).copied()
    }
}
