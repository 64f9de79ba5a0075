//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, entity instantiation and
//! inventory grants so clients can bubble them up with consistent context.
//! Rejected client commands never surface here; the worker logs and drops
//! them.
use thiserror::Error;
use tokio::sync::oneshot;

use arena_core::{CommandError, EntityId, SpawnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires content to be configured before building")]
    MissingContent,

    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Command(#[from] CommandError),
}
