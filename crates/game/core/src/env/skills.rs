use crate::stats::{LinearRange, LinearStat, StatBonus};

/// Read access to skill templates by stable name key.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, name: &str) -> Option<&SkillTemplate>;
}

/// What a skill does to its resolved target when the cast completes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Damage an enemy: caster damage plus `amount`.
    Damage { amount: LinearStat },
    /// Restore health and mana of a friendly target (falls back to the caster).
    Heal { health: LinearStat, mana: LinearStat },
    /// Timed bonus on a friendly target (falls back to the caster).
    Buff {
        bonus: StatBonus,
        duration_ms: LinearStat,
    },
    /// Timed bonus that always lands on the caster.
    SelfBuff {
        bonus: StatBonus,
        duration_ms: LinearStat,
    },
    /// Timed (usually negative) bonus on an enemy.
    Debuff {
        bonus: StatBonus,
        duration_ms: LinearStat,
    },
}

/// How a skill validates and corrects its target before the distance check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Targeting {
    /// Requires a living, attackable entity of another team.
    Enemy,
    /// Uses the selected target when it is a living ally, otherwise the caster.
    FriendlyOrSelf,
    /// Always the caster.
    SelfOnly,
}

impl SkillEffect {
    pub const fn targeting(&self) -> Targeting {
        match self {
            Self::Damage { .. } | Self::Debuff { .. } => Targeting::Enemy,
            Self::Heal { .. } | Self::Buff { .. } => Targeting::FriendlyOrSelf,
            Self::SelfBuff { .. } => Targeting::SelfOnly,
        }
    }
}

/// Static rules for a learnable skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillTemplate {
    pub name: String,
    pub effect: SkillEffect,
    #[cfg_attr(feature = "serde", serde(default = "default_max_level"))]
    pub max_level: u32,
    /// Entity level needed to reach each skill level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_level: LinearStat,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: LinearStat,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_time_ms: LinearStat,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_ms: LinearStat,
    pub cast_range: LinearRange,
    /// Abort the cast when the target disappears or dies mid-cast.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cancel_cast_if_target_died: bool,
    /// Queue the default attack after this skill completes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub followup_default_attack: bool,
}

#[cfg(feature = "serde")]
fn default_max_level() -> u32 {
    1
}

impl SkillTemplate {
    pub fn new(name: impl Into<String>, effect: SkillEffect, cast_range: f32) -> Self {
        Self {
            name: name.into(),
            effect,
            max_level: 1,
            required_level: LinearStat::flat(1),
            mana_cost: LinearStat::default(),
            cast_time_ms: LinearStat::default(),
            cooldown_ms: LinearStat::default(),
            cast_range: LinearRange::new(cast_range, 0.0),
            cancel_cast_if_target_died: false,
            followup_default_attack: false,
        }
    }

    pub fn targeting(&self) -> Targeting {
        self.effect.targeting()
    }

    /// Entity level required for `skill_level`.
    pub fn required_level_for(&self, skill_level: u32) -> u32 {
        self.required_level.get_u32(skill_level)
    }

    pub fn mana_cost_at(&self, skill_level: u32) -> u32 {
        self.mana_cost.get_u32(skill_level)
    }

    pub fn cast_time_at(&self, skill_level: u32) -> u64 {
        self.cast_time_ms.get_millis(skill_level)
    }

    pub fn cooldown_at(&self, skill_level: u32) -> u64 {
        self.cooldown_ms.get_millis(skill_level)
    }

    pub fn cast_range_at(&self, skill_level: u32) -> f32 {
        self.cast_range.get(skill_level)
    }

    pub fn with_cast_time(mut self, millis: i32) -> Self {
        self.cast_time_ms = LinearStat::flat(millis);
        self
    }

    pub fn with_cooldown(mut self, millis: i32) -> Self {
        self.cooldown_ms = LinearStat::flat(millis);
        self
    }

    pub fn with_mana_cost(mut self, mana: i32) -> Self {
        self.mana_cost = LinearStat::flat(mana);
        self
    }

    pub fn with_levels(mut self, max_level: u32, required_level: LinearStat) -> Self {
        self.max_level = max_level.max(1);
        self.required_level = required_level;
        self
    }

    pub fn cancel_if_target_died(mut self) -> Self {
        self.cancel_cast_if_target_died = true;
        self
    }

    pub fn followed_by_default_attack(mut self) -> Self {
        self.followup_default_attack = true;
        self
    }
}
