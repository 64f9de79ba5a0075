//! Per-entity skill instances.
//!
//! The set is index-aligned with the archetype's skill list: index 0 is the
//! default attack. Cast and cooldown timers are absolute timestamps so late
//! ticks still see an elapsed timer.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{SkillOracle, SkillTemplate};
use crate::error::{ErrorSeverity, GameError};
use crate::state::Timestamp;

/// Why a learn or upgrade request was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillError {
    #[error("skill index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error("skill {0} is not learned")]
    NotLearned(usize),

    #[error("skill {0} is already learned")]
    AlreadyLearned(usize),

    #[error("skill {0} is at its maximum level")]
    MaxLevel(usize),

    #[error("level {required} required, entity is level {level}")]
    LevelTooLow { required: u32, level: u32 },

    #[error("no skill points to spend")]
    NoSkillPoints,

    #[error("skill template '{0}' not found")]
    UnknownTemplate(String),
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTemplate(_) => ErrorSeverity::Internal,
            Self::LevelTooLow { .. } | Self::NoSkillPoints => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange(_) => "SKILL_INDEX_OUT_OF_RANGE",
            Self::NotLearned(_) => "SKILL_NOT_LEARNED",
            Self::AlreadyLearned(_) => "SKILL_ALREADY_LEARNED",
            Self::MaxLevel(_) => "SKILL_MAX_LEVEL",
            Self::LevelTooLow { .. } => "SKILL_LEVEL_TOO_LOW",
            Self::NoSkillPoints => "SKILL_NO_POINTS",
            Self::UnknownTemplate(_) => "SKILL_UNKNOWN_TEMPLATE",
        }
    }
}

/// One learnable skill and its timers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInstance {
    pub template: String,
    pub learned: bool,
    /// 1..=max_level once learned.
    pub level: u32,
    /// `ZERO` when not casting.
    pub cast_end: Timestamp,
    pub cooldown_end: Timestamp,
}

impl SkillInstance {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            learned: false,
            level: 0,
            cast_end: Timestamp::ZERO,
            cooldown_end: Timestamp::ZERO,
        }
    }

    pub fn is_ready(&self, now: Timestamp) -> bool {
        now >= self.cooldown_end
    }

    pub fn cast_time_remaining(&self, now: Timestamp) -> u64 {
        self.cast_end.remaining_from(now)
    }

    pub fn cooldown_remaining(&self, now: Timestamp) -> u64 {
        self.cooldown_end.remaining_from(now)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSet {
    skills: ArrayVec<SkillInstance, { GameConfig::MAX_SKILLS }>,
}

impl SkillSet {
    /// Builds unlearned instances for `templates`, then learns the default attack.
    ///
    /// Names past [`GameConfig::MAX_SKILLS`] are ignored.
    pub fn from_templates<'a>(templates: impl IntoIterator<Item = &'a String>) -> Self {
        let mut skills = ArrayVec::new();
        for name in templates.into_iter().take(GameConfig::MAX_SKILLS) {
            skills.push(SkillInstance::new(name.clone()));
        }
        if let Some(default) = skills.first_mut() {
            default.learned = true;
            default.level = 1;
        }
        Self { skills }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SkillInstance> {
        self.skills.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SkillInstance> {
        self.skills.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillInstance> {
        self.skills.iter()
    }

    /// Learned skill at `index`, if any.
    pub fn learned(&self, index: usize) -> Option<&SkillInstance> {
        self.get(index).filter(|skill| skill.learned)
    }

    /// `level − Σ learned levels + 1`, never negative.
    ///
    /// The extra point covers the default attack learned for free at level 1.
    pub fn spendable_points(&self, entity_level: u32) -> u32 {
        let spent: i64 = self
            .skills
            .iter()
            .filter(|skill| skill.learned)
            .map(|skill| i64::from(skill.level))
            .sum();
        (i64::from(entity_level) - spent + 1).max(0) as u32
    }

    pub fn can_learn(&self, index: usize, entity_level: u32, skills: &dyn SkillOracle) -> bool {
        self.check_learn(index, entity_level, skills).is_ok()
    }

    pub fn can_upgrade(&self, index: usize, entity_level: u32, skills: &dyn SkillOracle) -> bool {
        self.check_upgrade(index, entity_level, skills).is_ok()
    }

    pub fn learn(
        &mut self,
        index: usize,
        entity_level: u32,
        skills: &dyn SkillOracle,
    ) -> Result<(), SkillError> {
        self.check_learn(index, entity_level, skills)?;
        let skill = &mut self.skills[index];
        skill.learned = true;
        skill.level = 1;
        Ok(())
    }

    pub fn upgrade(
        &mut self,
        index: usize,
        entity_level: u32,
        skills: &dyn SkillOracle,
    ) -> Result<(), SkillError> {
        self.check_upgrade(index, entity_level, skills)?;
        self.skills[index].level += 1;
        Ok(())
    }

    /// Clears every cast and cooldown timer (used on respawn).
    pub fn reset_timers(&mut self) {
        for skill in &mut self.skills {
            skill.cast_end = Timestamp::ZERO;
            skill.cooldown_end = Timestamp::ZERO;
        }
    }

    fn check_learn(
        &self,
        index: usize,
        entity_level: u32,
        skills: &dyn SkillOracle,
    ) -> Result<(), SkillError> {
        let (skill, template) = self.lookup(index, skills)?;
        if skill.learned {
            return Err(SkillError::AlreadyLearned(index));
        }
        check_level(template.required_level_for(1), entity_level)?;
        self.check_points(entity_level)
    }

    fn check_upgrade(
        &self,
        index: usize,
        entity_level: u32,
        skills: &dyn SkillOracle,
    ) -> Result<(), SkillError> {
        let (skill, template) = self.lookup(index, skills)?;
        if !skill.learned {
            return Err(SkillError::NotLearned(index));
        }
        if skill.level >= template.max_level {
            return Err(SkillError::MaxLevel(index));
        }
        check_level(template.required_level_for(skill.level + 1), entity_level)?;
        self.check_points(entity_level)
    }

    fn lookup<'s, 't>(
        &'s self,
        index: usize,
        skills: &'t dyn SkillOracle,
    ) -> Result<(&'s SkillInstance, &'t SkillTemplate), SkillError> {
        let skill = self
            .skills
            .get(index)
            .ok_or(SkillError::IndexOutOfRange(index))?;
        let template = skills
            .skill(&skill.template)
            .ok_or_else(|| SkillError::UnknownTemplate(skill.template.clone()))?;
        Ok((skill, template))
    }

    fn check_points(&self, entity_level: u32) -> Result<(), SkillError> {
        if self.spendable_points(entity_level) == 0 {
            return Err(SkillError::NoSkillPoints);
        }
        Ok(())
    }
}

fn check_level(required: u32, level: u32) -> Result<(), SkillError> {
    if level < required {
        return Err(SkillError::LevelTooLow { required, level });
    }
    Ok(())
}
