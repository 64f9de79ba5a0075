//! Experience, levels, and kill rewards.
//!
//! All arithmetic is integer and saturating so the outcome is identical on
//! every authority.

/// Largest level difference that still changes a reward.
pub const MAX_REWARD_LEVEL_DIFF: i64 = 10;

/// Experience and gold granted for a kill, before level balancing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Reward {
    pub experience: u64,
    pub gold: u64,
}

impl Reward {
    pub const fn new(experience: u64, gold: u64) -> Self {
        Self { experience, gold }
    }

    /// Both parts balanced by the level difference between victim and attacker.
    pub fn balanced(&self, attacker_level: u32, victim_level: u32) -> Reward {
        Reward {
            experience: balance_reward(self.experience, attacker_level, victim_level),
            gold: balance_reward(self.gold, attacker_level, victim_level),
        }
    }
}

/// Scale a base reward by the victim/attacker level difference.
///
/// `floor(base × (1 + clamp(victim − attacker, −10, 10) × 0.1))`: a victim
/// ten or more levels above the attacker doubles the reward, one ten or more
/// levels below yields nothing.
pub fn balance_reward(base: u64, attacker_level: u32, victim_level: u32) -> u64 {
    let diff = (victim_level as i64 - attacker_level as i64)
        .clamp(-MAX_REWARD_LEVEL_DIFF, MAX_REWARD_LEVEL_DIFF);
    let factor = (MAX_REWARD_LEVEL_DIFF + diff) as u64;
    base.saturating_mul(factor) / MAX_REWARD_LEVEL_DIFF as u64
}

/// Experience needed to advance from a level to the next.
///
/// `required(level) = base + per_level × (level − 1)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceCurve {
    pub base: u64,
    pub per_level: u64,
}

impl ExperienceCurve {
    pub const fn new(base: u64, per_level: u64) -> Self {
        Self { base, per_level }
    }

    pub fn required(&self, level: u32) -> u64 {
        let steps = u64::from(level.saturating_sub(1));
        self.base
            .saturating_add(self.per_level.saturating_mul(steps))
            .max(1)
    }
}

impl Default for ExperienceCurve {
    fn default() -> Self {
        Self::new(100, 50)
    }
}

/// Add `amount` experience, cascading level-ups.
///
/// Overflow past a level's requirement carries into the next level. At
/// `max_level` the experience is clamped to that level's requirement.
/// Returns the number of levels gained.
pub fn gain_experience(
    level: &mut u32,
    experience: &mut u64,
    amount: u64,
    curve: &ExperienceCurve,
    max_level: u32,
) -> u32 {
    let start = *level;
    *experience = experience.saturating_add(amount);

    while *level < max_level {
        let required = curve.required(*level);
        if *experience < required {
            break;
        }
        *experience -= required;
        *level += 1;
    }

    if *level >= max_level {
        *experience = (*experience).min(curve.required(*level));
    }

    *level - start
}

/// Portion of `value` lost on death.
pub fn death_penalty(value: u64, percent: u8) -> u64 {
    value.saturating_mul(u64::from(percent.min(100))) / 100
}
