//! Event types for different topics.

use arena_core::{ArenaEvent, EntitySnapshot, Timestamp};
use serde::{Deserialize, Serialize};

/// One simulation outcome, stamped with the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick nonce. Zero for events raised between ticks (spawns).
    pub tick: u64,
    pub now: Timestamp,
    pub event: ArenaEvent,
}

/// Observable state of every entity after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEvent {
    pub tick: u64,
    pub now: Timestamp,
    pub entities: Vec<EntitySnapshot>,
}
