//! Additive stat bonuses and their clamping bounds.
//!
//! Every bonus source (inventory items, active buffs) contributes a
//! [`StatBonus`]. Contributions are summed and added to the entity's base
//! value; the result is clamped by the matching [`StatBounds`].

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Flat deltas applied to each derived attribute.
///
/// Chances are whole percentages (`25` = 25%).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBonus {
    pub health_max: i32,
    pub mana_max: i32,
    pub damage: i32,
    pub defense: i32,
    pub block_chance: i32,
    pub critical_chance: i32,
}

impl StatBonus {
    pub const ZERO: Self = Self {
        health_max: 0,
        mana_max: 0,
        damage: 0,
        defense: 0,
        block_chance: 0,
        critical_chance: 0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Add a health bonus (builder pattern)
    pub fn with_health_max(mut self, value: i32) -> Self {
        self.health_max = value;
        self
    }

    /// Add a mana bonus (builder pattern)
    pub fn with_mana_max(mut self, value: i32) -> Self {
        self.mana_max = value;
        self
    }

    /// Add a damage bonus (builder pattern)
    pub fn with_damage(mut self, value: i32) -> Self {
        self.damage = value;
        self
    }

    /// Add a defense bonus (builder pattern)
    pub fn with_defense(mut self, value: i32) -> Self {
        self.defense = value;
        self
    }

    /// Add a block chance bonus in percent (builder pattern)
    pub fn with_block_chance(mut self, percent: i32) -> Self {
        self.block_chance = percent;
        self
    }

    /// Add a critical chance bonus in percent (builder pattern)
    pub fn with_critical_chance(mut self, percent: i32) -> Self {
        self.critical_chance = percent;
        self
    }
}

impl Add for StatBonus {
    type Output = StatBonus;

    fn add(self, rhs: StatBonus) -> StatBonus {
        StatBonus {
            health_max: self.health_max.saturating_add(rhs.health_max),
            mana_max: self.mana_max.saturating_add(rhs.mana_max),
            damage: self.damage.saturating_add(rhs.damage),
            defense: self.defense.saturating_add(rhs.defense),
            block_chance: self.block_chance.saturating_add(rhs.block_chance),
            critical_chance: self.critical_chance.saturating_add(rhs.critical_chance),
        }
    }
}

impl AddAssign for StatBonus {
    fn add_assign(&mut self, rhs: StatBonus) {
        *self = *self + rhs;
    }
}

impl Sum for StatBonus {
    fn sum<I: Iterator<Item = StatBonus>>(iter: I) -> StatBonus {
        iter.fold(StatBonus::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a StatBonus> for StatBonus {
    fn sum<I: Iterator<Item = &'a StatBonus>>(iter: I) -> StatBonus {
        iter.copied().sum()
    }
}

/// Bounds configuration for a specific stat calculation.
///
/// This centralizes all clamping bounds in one place.
#[derive(Clone, Copy, Debug)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Maximum health never drops to zero: a living entity always has room for 1 HP.
    pub const HEALTH_MAX: Self = Self {
        min: 1,
        max: 999_999,
    };

    pub const MANA_MAX: Self = Self {
        min: 0,
        max: 999_999,
    };

    /// Damage and defense.
    pub const COMBAT: Self = Self { min: 0, max: 99_999 };

    /// Block and critical chance, in percent.
    pub const CHANCE: Self = Self { min: 0, max: 100 };

    /// Apply `bonus` to `base` and clamp.
    pub fn apply(self, base: i32, bonus: i32) -> i32 {
        base.saturating_add(bonus).clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonuses_sum_fieldwise() {
        let sword = StatBonus::default().with_damage(5).with_critical_chance(3);
        let shield = StatBonus::default().with_defense(4).with_block_chance(10);
        let total: StatBonus = [sword, shield].iter().sum();

        assert_eq!(total.damage, 5);
        assert_eq!(total.defense, 4);
        assert_eq!(total.block_chance, 10);
        assert_eq!(total.critical_chance, 3);
        assert_eq!(total.health_max, 0);
    }

    #[test]
    fn bounds_clamp_negative_totals() {
        assert_eq!(StatBounds::HEALTH_MAX.apply(10, -50), 1);
        assert_eq!(StatBounds::CHANCE.apply(90, 40), 100);
        assert_eq!(StatBounds::COMBAT.apply(3, -5), 0);
    }
}
