//! Errors surfaced by the engine's entry points.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, EntityKind, InventoryError, SkillError, Team};

/// A client command that was refused.
///
/// Refusals never mutate state. Session entry points log these at debug
/// level and drop them so a client gets no explanation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("entity {0} is dead")]
    EntityDead(EntityId),

    #[error("entity {0} has no inventory")]
    NotAPlayer(EntityId),

    #[error("target {0} does not exist")]
    UnknownTarget(EntityId),

    #[error("skill {0} is not learned")]
    SkillNotLearned(usize),

    #[error("item in slot {0} cannot be used")]
    NotUsable(usize),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Skill(#[from] SkillError),
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Inventory(err) => err.severity(),
            Self::Skill(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn entity(&self) -> Option<EntityId> {
        match self {
            Self::UnknownEntity(id) | Self::EntityDead(id) | Self::NotAPlayer(id) => Some(*id),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "COMMAND_UNKNOWN_ENTITY",
            Self::EntityDead(_) => "COMMAND_ENTITY_DEAD",
            Self::NotAPlayer(_) => "COMMAND_NOT_A_PLAYER",
            Self::UnknownTarget(_) => "COMMAND_UNKNOWN_TARGET",
            Self::SkillNotLearned(_) => "COMMAND_SKILL_NOT_LEARNED",
            Self::NotUsable(_) => "COMMAND_NOT_USABLE",
            Self::Inventory(err) => err.error_code(),
            Self::Skill(err) => err.error_code(),
        }
    }
}

/// Failure to instantiate an entity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("archetype '{archetype}' of kind {kind} cannot be spawned this way")]
    WrongKind { archetype: String, kind: EntityKind },

    #[error("no spawn point for {0}")]
    NoSpawnPoint(Team),

    #[error("entity id space exhausted")]
    IdsExhausted,
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(err) => err.severity(),
            Self::WrongKind { .. } => ErrorSeverity::Validation,
            Self::NoSpawnPoint(_) => ErrorSeverity::Recoverable,
            Self::IdsExhausted => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(err) => err.error_code(),
            Self::WrongKind { .. } => "SPAWN_WRONG_KIND",
            Self::NoSpawnPoint(_) => "SPAWN_NO_SPAWN_POINT",
            Self::IdsExhausted => "SPAWN_IDS_EXHAUSTED",
        }
    }
}
