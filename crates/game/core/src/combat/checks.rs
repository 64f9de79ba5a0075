//! Cast validation: self, target, then distance.

use std::collections::BTreeMap;

use crate::env::{SkillTemplate, Targeting};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Entity, EntityId, Position, Timestamp};

/// Why a cast could not start or resolve.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error("caster is dead")]
    CasterDead,

    #[error("skill {0} is not learned")]
    NotLearned(usize),

    #[error("skill template '{0}' not found")]
    UnknownTemplate(String),

    #[error("needs {required} mana, has {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("skill is on cooldown for {remaining_ms}ms")]
    OnCooldown { remaining_ms: u64 },

    #[error("no target selected")]
    NoTarget,

    #[error("target {0} no longer exists")]
    TargetMissing(EntityId),

    #[error("target {0} is not a valid target for this skill")]
    InvalidTarget(EntityId),
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OnCooldown { .. } | Self::InsufficientMana { .. } => ErrorSeverity::Recoverable,
            Self::UnknownTemplate(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CasterDead => "CAST_CASTER_DEAD",
            Self::NotLearned(_) => "CAST_NOT_LEARNED",
            Self::UnknownTemplate(_) => "CAST_UNKNOWN_TEMPLATE",
            Self::InsufficientMana { .. } => "CAST_INSUFFICIENT_MANA",
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::NoTarget => "CAST_NO_TARGET",
            Self::TargetMissing(_) => "CAST_TARGET_MISSING",
            Self::InvalidTarget(_) => "CAST_INVALID_TARGET",
        }
    }
}

/// Target of a skill after correction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastTarget {
    Caster,
    Other(EntityId),
}

impl CastTarget {
    pub fn id(self, caster: EntityId) -> EntityId {
        match self {
            Self::Caster => caster,
            Self::Other(id) => id,
        }
    }

    pub fn position(self, caster: &Entity, others: &BTreeMap<EntityId, Entity>) -> Option<Position> {
        match self {
            Self::Caster => Some(caster.position),
            Self::Other(id) => others.get(&id).map(|entity| entity.position),
        }
    }
}

/// Outcome of the distance check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reach {
    InRange,
    /// Out of range: walk here, then try again.
    MoveTo(Position),
}

/// Caster alive, skill learned, enough mana and (unless ignored) off cooldown.
pub fn check_self(
    caster: &Entity,
    index: usize,
    template: &SkillTemplate,
    now: Timestamp,
    ignore_cooldown: bool,
) -> Result<(), CastError> {
    if !caster.is_alive() {
        return Err(CastError::CasterDead);
    }
    let skill = caster
        .skills
        .learned(index)
        .ok_or(CastError::NotLearned(index))?;
    let required = template.mana_cost_at(skill.level);
    if caster.mana < required {
        return Err(CastError::InsufficientMana {
            required,
            available: caster.mana,
        });
    }
    if !ignore_cooldown && !skill.is_ready(now) {
        return Err(CastError::OnCooldown {
            remaining_ms: skill.cooldown_remaining(now),
        });
    }
    Ok(())
}

/// Validates the selected target and corrects it where the skill allows.
///
/// Friendly skills fall back to the caster when the selection is not a
/// living ally; self skills always resolve to the caster.
pub fn check_target(
    caster: &Entity,
    others: &BTreeMap<EntityId, Entity>,
    template: &SkillTemplate,
) -> Result<CastTarget, CastError> {
    match template.targeting() {
        Targeting::SelfOnly => Ok(CastTarget::Caster),
        Targeting::FriendlyOrSelf => {
            let ally = caster
                .target
                .filter(|id| *id != caster.id)
                .and_then(|id| others.get(&id))
                .filter(|other| other.is_alive() && !other.hidden && !caster.is_enemy_of(other));
            Ok(ally.map_or(CastTarget::Caster, |other| CastTarget::Other(other.id)))
        }
        Targeting::Enemy => {
            let id = caster.target.ok_or(CastError::NoTarget)?;
            if id == caster.id {
                return Err(CastError::InvalidTarget(id));
            }
            let other = others.get(&id).ok_or(CastError::TargetMissing(id))?;
            if !other.is_attackable() || !caster.is_enemy_of(other) {
                return Err(CastError::InvalidTarget(id));
            }
            Ok(CastTarget::Other(id))
        }
    }
}

/// In range, or the point `approach_ratio × range` away from the target
/// along the line toward the caster.
pub fn check_distance(caster: Position, target: Position, range: f32, approach_ratio: f32) -> Reach {
    if caster.distance(&target) <= range {
        Reach::InRange
    } else {
        Reach::MoveTo(target.offset_toward(&caster, range * approach_ratio))
    }
}

/// The current target disappeared or died (self-targets never vanish).
pub fn target_lost(caster: &Entity, others: &BTreeMap<EntityId, Entity>) -> bool {
    match caster.target {
        None => true,
        Some(id) if id == caster.id => false,
        Some(id) => others
            .get(&id)
            .is_none_or(|target| target.hidden || !target.is_alive()),
    }
}
