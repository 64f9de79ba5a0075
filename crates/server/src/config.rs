//! Authority process configuration and loaders.
use std::env;
use std::path::PathBuf;

use arena_runtime::RuntimeConfig;

/// Configuration required to boot the arena authority.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directory holding `config.toml` and the `.ron` catalogs.
    pub content_dir: PathBuf,
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("data/arena"),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_CONTENT_DIR` - Content directory (default: data/arena)
    /// - `ARENA_TICK_MS` - Tick length in milliseconds (default: 100)
    /// - `ARENA_SEED` - Combat roll seed (default: 0)
    /// - `ARENA_EVENT_BUFFER` - Events buffered per topic (default: 1024)
    /// - `ARENA_COMMAND_BUFFER` - Pending client commands (default: 256)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|value| value.trim().parse::<u64>().ok());

        let mut config = Self::default();
        if let Some(dir) = lookup("ARENA_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Some(tick) = parse("ARENA_TICK_MS") {
            config.runtime.tick_interval_ms = tick.max(1);
        }
        if let Some(seed) = parse("ARENA_SEED") {
            config.runtime.game_seed = seed;
        }
        if let Some(capacity) = parse("ARENA_EVENT_BUFFER") {
            config.runtime.event_buffer_size = (capacity as usize).max(1);
        }
        if let Some(capacity) = parse("ARENA_COMMAND_BUFFER") {
            config.runtime.command_buffer_size = (capacity as usize).max(1);
        }
        config
    }
}
