//! Template and spawn lookup errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Team;

/// Errors raised while building or querying static content.
///
/// Lookups made during a tick never surface these: a missing template there
/// degrades to a zero contribution. They are raised while building the
/// registry and while spawning, where there is no sane fallback.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("item template '{0}' not found")]
    ItemNotFound(String),

    #[error("skill template '{0}' not found")]
    SkillNotFound(String),

    #[error("archetype '{0}' not found")]
    ArchetypeNotFound(String),

    #[error("no spawn point for {0}")]
    SpawnPointNotFound(Team),

    #[error("template name '{0}' is registered twice")]
    DuplicateTemplate(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            ItemNotFound(_) | SkillNotFound(_) | ArchetypeNotFound(_) => ErrorSeverity::Validation,
            SpawnPointNotFound(_) => ErrorSeverity::Recoverable,
            DuplicateTemplate(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            SkillNotFound(_) => "ORACLE_SKILL_NOT_FOUND",
            ArchetypeNotFound(_) => "ORACLE_ARCHETYPE_NOT_FOUND",
            SpawnPointNotFound(_) => "ORACLE_SPAWN_POINT_NOT_FOUND",
            DuplicateTemplate(_) => "ORACLE_DUPLICATE_TEMPLATE",
        }
    }
}
