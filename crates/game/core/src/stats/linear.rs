//! Level-scaled template values.

/// Integer value that grows linearly with level.
///
/// `get(level) = base + per_level × (level − 1)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinearStat {
    pub base: i32,
    pub per_level: i32,
}

impl LinearStat {
    pub const fn new(base: i32, per_level: i32) -> Self {
        Self { base, per_level }
    }

    pub const fn flat(base: i32) -> Self {
        Self { base, per_level: 0 }
    }

    pub fn get(&self, level: u32) -> i32 {
        let steps = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
        self.base.saturating_add(self.per_level.saturating_mul(steps))
    }

    /// Value at `level`, clamped at zero.
    pub fn get_u32(&self, level: u32) -> u32 {
        self.get(level).max(0) as u32
    }

    /// Duration-like value at `level` in milliseconds, clamped at zero.
    pub fn get_millis(&self, level: u32) -> u64 {
        self.get(level).max(0) as u64
    }
}

/// Distance value that grows linearly with level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinearRange {
    pub base: f32,
    pub per_level: f32,
}

impl LinearRange {
    pub const fn new(base: f32, per_level: f32) -> Self {
        Self { base, per_level }
    }

    pub fn get(&self, level: u32) -> f32 {
        (self.base + self.per_level * level.saturating_sub(1) as f32).max(0.0)
    }
}
