//! Shared, read-only content handed to the simulation.
//!
//! [`OracleManager`] owns the loaded [`Content`] behind an `Arc` so it can be
//! cloned cheaply into workers, and builds [`GameEnv`] views on demand. The
//! data is immutable at runtime; dynamic state lives in the worker's
//! [`arena_core::ArenaState`].
use std::sync::Arc;

use arena_content::Content;
use arena_core::{GameConfig, GameEnv, PcgRng};

/// Manages content oracles and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) content: Arc<Content>,
    pub(crate) rng: PcgRng,
}

impl OracleManager {
    pub fn new(content: Content) -> Self {
        Self {
            content: Arc::new(content),
            rng: PcgRng, // PcgRng is stateless
        }
    }

    /// Converts oracle manager into GameEnv for arena-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        self.content.env(&self.rng)
    }

    pub fn config(&self) -> &GameConfig {
        &self.content.config
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}

impl From<Content> for OracleManager {
    fn from(content: Content) -> Self {
        Self::new(content)
    }
}
