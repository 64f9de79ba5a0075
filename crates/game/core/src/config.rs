use crate::stats::{ExperienceCurve, Reward};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Number of inventory slots every player gets.
    pub inventory_capacity: usize,
    pub max_level: u32,
    pub experience_curve: ExperienceCurve,
    /// Percentage of experience and gold a player loses on death.
    pub death_penalty_percent: u8,
    /// Delay from death until the body stops being interactable.
    pub disappear_after_ms: u64,
    /// Extra delay after disappearing until respawn.
    pub respawn_delay_ms: u64,
    /// When out of range, move until this percentage of the cast range is reached.
    pub move_to_range_percent: u8,
    /// Base reward for killing a player (monsters carry their own).
    pub player_kill_reward: Reward,
    /// Vitals recovery period.
    pub recovery_interval_ms: u64,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const MAX_BUFFS: usize = 16;
    pub const MAX_SKILLS: usize = 16;
    pub const MAX_INVENTORY_SLOTS: usize = 64;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 30;
    pub const DEFAULT_MAX_LEVEL: u32 = 50;
    pub const DEFAULT_DEATH_PENALTY_PERCENT: u8 = 5;
    pub const DEFAULT_DISAPPEAR_AFTER_MS: u64 = 10_000;
    pub const DEFAULT_RESPAWN_DELAY_MS: u64 = 20_000;
    pub const DEFAULT_MOVE_TO_RANGE_PERCENT: u8 = 80;
    pub const DEFAULT_RECOVERY_INTERVAL_MS: u64 = 1_000;

    pub fn new() -> Self {
        Self {
            inventory_capacity: Self::DEFAULT_INVENTORY_CAPACITY,
            max_level: Self::DEFAULT_MAX_LEVEL,
            experience_curve: ExperienceCurve::default(),
            death_penalty_percent: Self::DEFAULT_DEATH_PENALTY_PERCENT,
            disappear_after_ms: Self::DEFAULT_DISAPPEAR_AFTER_MS,
            respawn_delay_ms: Self::DEFAULT_RESPAWN_DELAY_MS,
            move_to_range_percent: Self::DEFAULT_MOVE_TO_RANGE_PERCENT,
            player_kill_reward: Reward::new(50, 10),
            recovery_interval_ms: Self::DEFAULT_RECOVERY_INTERVAL_MS,
        }
    }

    /// Inventory size clamped to the compile-time maximum.
    pub fn inventory_slots(&self) -> usize {
        self.inventory_capacity.min(Self::MAX_INVENTORY_SLOTS)
    }

    /// Fraction of a cast range used as the approach distance.
    pub fn approach_ratio(&self) -> f32 {
        f32::from(self.move_to_range_percent.min(100)) / 100.0
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
