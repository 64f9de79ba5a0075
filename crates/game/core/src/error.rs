//! Common error infrastructure for arena-core.
//!
//! Domain errors (`CommandError`, `SpawnError`, `OracleError`) live next to
//! the code that raises them and share the classification defined here.
//!
//! Nothing in the simulation propagates these past an entity boundary: the
//! tick loop and the command entry points log and discard them so one
//! entity's bad input or inconsistent data never stalls the others.

use crate::state::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed later without changing the input
/// - **Validation**: invalid input, reject without retry
/// - **Internal**: unexpected state inconsistency
/// - **Fatal**: configuration or content that cannot be used at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: skill on cooldown, no spawn point yet.
    Recoverable,

    /// Examples: slot index out of range, command while dead.
    Validation,

    /// Examples: entity references a skill template that vanished.
    /// These indicate bugs and should be investigated.
    Internal,

    /// Examples: duplicate template names.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all arena-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Entity the error is about, if any.
    fn entity(&self) -> Option<EntityId> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
