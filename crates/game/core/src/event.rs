//! Observable outcomes of a tick.

use crate::state::{EntityId, EntityState, Position, Timestamp};

/// How a damaging hit resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum HitKind {
    Normal,
    Blocked,
    Critical,
}

/// Everything the simulation reports to observers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArenaEvent {
    Spawned {
        entity: EntityId,
        position: Position,
    },
    StateChanged {
        entity: EntityId,
        from: EntityState,
        to: EntityState,
    },
    CastStarted {
        entity: EntityId,
        skill: usize,
        target: Option<EntityId>,
        ends_at: Timestamp,
    },
    CastFinished {
        entity: EntityId,
        skill: usize,
        target: EntityId,
    },
    CastAborted {
        entity: EntityId,
        skill: usize,
    },
    Damaged {
        attacker: EntityId,
        target: EntityId,
        amount: u32,
        kind: HitKind,
    },
    Healed {
        source: EntityId,
        target: EntityId,
        health: u32,
        mana: u32,
    },
    BuffApplied {
        source: EntityId,
        target: EntityId,
        buff: String,
        expires_at: Timestamp,
    },
    Died {
        entity: EntityId,
    },
    Rewarded {
        entity: EntityId,
        victim: EntityId,
        experience: u64,
        gold: u64,
    },
    LeveledUp {
        entity: EntityId,
        level: u32,
    },
    Disappeared {
        entity: EntityId,
    },
    Respawned {
        entity: EntityId,
        position: Position,
    },
    Despawned {
        entity: EntityId,
    },
}

impl ArenaEvent {
    /// Entity the event is primarily about.
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Spawned { entity, .. }
            | Self::StateChanged { entity, .. }
            | Self::CastStarted { entity, .. }
            | Self::CastFinished { entity, .. }
            | Self::CastAborted { entity, .. }
            | Self::Died { entity }
            | Self::Rewarded { entity, .. }
            | Self::LeveledUp { entity, .. }
            | Self::Disappeared { entity }
            | Self::Respawned { entity, .. }
            | Self::Despawned { entity } => *entity,
            Self::Damaged { target, .. }
            | Self::Healed { target, .. }
            | Self::BuffApplied { target, .. } => *target,
        }
    }
}
