//! Stat Model.
//!
//! Derived attributes are never stored. They are recomputed on demand as
//!
//! ```text
//! effective = base(level) + Σ item bonuses + Σ buff bonuses   (then clamped)
//! ```
//!
//! for max health, max mana, damage, defense, block chance and critical
//! chance. Only current health/mana live in entity state.

pub mod bonus;
pub mod experience;
pub mod linear;

pub use bonus::{StatBonus, StatBounds};
pub use experience::{
    ExperienceCurve, MAX_REWARD_LEVEL_DIFF, Reward, balance_reward, death_penalty,
    gain_experience,
};
pub use linear::{LinearRange, LinearStat};

/// Level-scaled base attributes of an archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub health: LinearStat,
    pub mana: LinearStat,
    pub damage: LinearStat,
    pub defense: LinearStat,
    /// Percent.
    pub block_chance: i32,
    /// Percent.
    pub critical_chance: i32,
    /// Health regained per recovery interval.
    pub health_recovery: u32,
    /// Mana regained per recovery interval.
    pub mana_recovery: u32,
}

/// Effective attributes after all bonuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveStats {
    pub health_max: u32,
    pub mana_max: u32,
    pub damage: u32,
    pub defense: u32,
    pub block_chance: u32,
    pub critical_chance: u32,
}

impl EffectiveStats {
    /// Pure combination of base values and the summed bonus.
    pub fn compute(base: &BaseStats, level: u32, bonus: &StatBonus) -> Self {
        Self {
            health_max: StatBounds::HEALTH_MAX.apply(base.health.get(level), bonus.health_max)
                as u32,
            mana_max: StatBounds::MANA_MAX.apply(base.mana.get(level), bonus.mana_max) as u32,
            damage: StatBounds::COMBAT.apply(base.damage.get(level), bonus.damage) as u32,
            defense: StatBounds::COMBAT.apply(base.defense.get(level), bonus.defense) as u32,
            block_chance: StatBounds::CHANCE.apply(base.block_chance, bonus.block_chance) as u32,
            critical_chance: StatBounds::CHANCE
                .apply(base.critical_chance, bonus.critical_chance)
                as u32,
        }
    }
}
