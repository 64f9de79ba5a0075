use std::fmt;

/// Unique identifier for any entity tracked in the arena.
///
/// Identifiers are allocated monotonically and never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team allegiance. Entities on the same team never damage each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team(pub u8);

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team-{}", self.0)
    }
}

/// Continuous world position.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Moves from `self` toward `other` by at most `step` units.
    pub fn step_toward(&self, other: &Position, step: f32) -> Position {
        let distance = self.distance(other);
        if distance <= step || distance == 0.0 {
            return *other;
        }
        let t = step / distance;
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Point on the segment from `self` toward `other` located `offset` units away from `self`.
    ///
    /// Returns `self` when both points coincide.
    pub fn offset_toward(&self, other: &Position, offset: f32) -> Position {
        let distance = self.distance(other);
        if distance == 0.0 {
            return *self;
        }
        let t = offset / distance;
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Yaw (rotation around the vertical axis, radians) that faces `other` from `self`.
    pub fn yaw_toward(&self, other: &Position) -> Option<f32> {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        if dx == 0.0 && dz == 0.0 {
            return None;
        }
        Some(dx.atan2(dz))
    }
}

/// Absolute authority time in milliseconds.
///
/// All timers (cast end, cooldown end, death and respawn) are stored as
/// absolute timestamps and compared on the next evaluation, so a late tick
/// never misses an elapsed timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds until `self` is reached from `now`, clamped at zero.
    pub const fn remaining_from(self, now: Timestamp) -> u64 {
        self.0.saturating_sub(now.0)
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
