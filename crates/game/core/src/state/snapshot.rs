//! Externally observable entity state.
//!
//! Snapshots are fixed-shape records: empty inventory slots are reported as
//! `valid: false` entries rather than omitted, so observers that cannot
//! represent optional values still see every slot.

use crate::env::ItemOracle;
use crate::state::{Entity, EntityId, EntityKind, EntityState, ItemStack, Position, Team, Timestamp};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotSnapshot {
    pub template: String,
    pub quantity: u16,
    pub valid: bool,
}

impl SlotSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Option<&ItemStack>> for SlotSnapshot {
    fn from(slot: Option<&ItemStack>) -> Self {
        match slot {
            Some(stack) => Self {
                template: stack.template.clone(),
                quantity: stack.quantity,
                valid: true,
            },
            None => Self::empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub team: Team,
    pub state: EntityState,
    pub level: u32,
    pub health: u32,
    pub health_max: u32,
    pub mana: u32,
    pub mana_max: u32,
    pub position: Position,
    pub yaw: f32,
    pub target: Option<EntityId>,
    pub current_skill: Option<usize>,
    pub inventory: Vec<SlotSnapshot>,
    pub gold: u64,
    pub experience: u64,
    pub respawn_at: Timestamp,
    pub hidden: bool,
}

impl EntitySnapshot {
    pub fn capture(entity: &Entity, items: &dyn ItemOracle) -> Self {
        let stats = entity.stats(items);
        let (inventory, gold, experience) = match &entity.player {
            Some(player) => (
                player.inventory.slots().map(SlotSnapshot::from).collect(),
                player.gold,
                player.experience,
            ),
            None => (Vec::new(), 0, 0),
        };

        Self {
            id: entity.id,
            name: entity.name.clone(),
            kind: entity.kind,
            team: entity.team,
            state: entity.state,
            level: entity.level,
            health: entity.health,
            health_max: stats.health_max,
            mana: entity.mana,
            mana_max: stats.mana_max,
            position: entity.position,
            yaw: entity.yaw,
            target: entity.target,
            current_skill: entity.current_skill,
            inventory,
            gold,
            experience,
            respawn_at: entity.respawn_at,
            hidden: entity.hidden,
        }
    }

    /// State name as observers see it (`"IDLE"`, `"CASTING"`, ...).
    pub fn state_name(&self) -> &str {
        self.state.as_ref()
    }
}
