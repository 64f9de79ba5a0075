//! Authoritative arena state.
//!
//! This module owns the data structures that describe entities, their
//! inventories, skills, buffs, and pending commands. Runtime layers query or
//! snapshot this state but mutate it exclusively through the engine.
mod buffs;
mod commands;
mod common;
mod entity;
mod inventory;
mod item;
mod skills;
mod snapshot;

use std::collections::BTreeMap;

pub use buffs::{Buff, Buffs};
pub use commands::{ClientCommand, CommandFlags, NavigateRequest, PendingCommands};
pub use common::{EntityId, Position, Team, Timestamp};
pub use entity::{Capabilities, Entity, EntityKind, EntityState, PlayerData};
pub use inventory::{Inventory, InventoryError};
pub use item::ItemStack;
pub use skills::{SkillError, SkillInstance, SkillSet};
pub use snapshot::{EntitySnapshot, SlotSnapshot};

/// Canonical snapshot of the arena simulation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArenaState {
    /// RNG seed, set once at arena creation.
    ///
    /// Combined with `nonce` to derive a unique seed for every roll.
    pub game_seed: u64,

    /// Number of ticks executed so far.
    pub nonce: u64,

    /// Authority time of the last tick.
    pub now: Timestamp,

    /// Sequential id allocator. Ids are never reused.
    next_entity_id: u32,

    /// Ordered by id so every tick processes entities in the same order.
    pub entities: BTreeMap<EntityId, Entity>,
}

impl ArenaState {
    pub fn new(game_seed: u64) -> Self {
        Self {
            game_seed,
            nonce: 0,
            now: Timestamp::ZERO,
            next_entity_id: 1,
            entities: BTreeMap::new(),
        }
    }

    /// Allocates a fresh id, or `None` once the id space is exhausted.
    pub fn allocate_entity_id(&mut self) -> Option<EntityId> {
        let id = self.next_entity_id.max(1);
        self.next_entity_id = id.checked_add(1)?;
        Some(EntityId(id))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
