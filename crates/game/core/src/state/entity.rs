//! Combat-capable entities.

use bitflags::bitflags;

use crate::env::{ArchetypeTemplate, ItemOracle};
use crate::state::{
    Buffs, EntityId, Inventory, PendingCommands, Position, SkillSet, Team, Timestamp,
};
use crate::stats::{BaseStats, EffectiveStats, Reward, StatBonus};

/// Finite-state-machine state of an entity.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EntityState {
    #[default]
    Idle,
    Moving,
    Casting,
    /// Revisited every life; respawn returns to `Idle`.
    Dead,
}

/// Closed set of entity categories.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityKind {
    Player,
    #[default]
    Monster,
    Structure,
    Npc,
}

bitflags! {
    /// What other entities may do with this one.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        const ATTACKABLE   = 1 << 0;
        const INTERACTABLE = 1 << 1;
    }
}

impl Capabilities {
    /// Default for anything that fights.
    pub fn combatant() -> Self {
        Self::ATTACKABLE | Self::INTERACTABLE
    }
}

/// Player-only economy state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerData {
    pub inventory: Inventory,
    pub gold: u64,
    /// Progress toward the next level.
    pub experience: u64,
}

impl PlayerData {
    pub fn new(inventory_slots: usize) -> Self {
        Self {
            inventory: Inventory::with_capacity(inventory_slots),
            gold: 0,
            experience: 0,
        }
    }
}

/// Authoritative state of one entity.
///
/// `health` and `mana` are the only stored vitals. Their maxima are derived
/// on demand from the base stats, inventory, and active buffs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub archetype: String,
    pub kind: EntityKind,
    pub capabilities: Capabilities,
    pub team: Team,
    pub level: u32,
    pub base: BaseStats,
    pub health: u32,
    pub mana: u32,
    pub position: Position,
    /// Facing in radians around the vertical axis.
    pub yaw: f32,
    pub state: EntityState,
    pub target: Option<EntityId>,
    /// Target chosen while casting, applied when the cast ends.
    pub next_target: Option<EntityId>,
    pub current_skill: Option<usize>,
    /// Skill requested while casting, started after the current cast.
    pub next_skill: Option<usize>,
    pub skills: SkillSet,
    pub buffs: Buffs,
    pub pending: PendingCommands,
    /// Set once the corpse is no longer interactable.
    pub hidden: bool,
    pub disappear_at: Timestamp,
    pub respawn_at: Timestamp,
    pub respawns: bool,
    pub next_recovery: Timestamp,
    pub kill_reward: Reward,
    pub player: Option<PlayerData>,
}

impl Entity {
    /// Instantiates `archetype` at level 1 with full vitals.
    pub fn from_archetype(
        id: EntityId,
        name: impl Into<String>,
        archetype: &ArchetypeTemplate,
        team: Team,
        position: Position,
        player: Option<PlayerData>,
    ) -> Self {
        let mut entity = Self {
            id,
            name: name.into(),
            archetype: archetype.name.clone(),
            kind: archetype.kind,
            capabilities: archetype.capabilities,
            team,
            level: 1,
            base: archetype.base,
            health: 0,
            mana: 0,
            position,
            yaw: 0.0,
            state: EntityState::Idle,
            target: None,
            next_target: None,
            current_skill: None,
            next_skill: None,
            skills: SkillSet::from_templates(&archetype.skills),
            buffs: Buffs::empty(),
            pending: PendingCommands::default(),
            hidden: false,
            disappear_at: Timestamp::ZERO,
            respawn_at: Timestamp::ZERO,
            respawns: archetype.respawns,
            next_recovery: Timestamp::ZERO,
            kill_reward: archetype.kill_reward,
            player,
        };
        entity.health = entity.base.health.get_u32(1).max(1);
        entity.mana = entity.base.mana.get_u32(1);
        entity
    }

    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }

    pub fn is_dead(&self) -> bool {
        self.state == EntityState::Dead
    }

    /// Health reached zero but death has not been processed yet.
    pub fn has_died(&self) -> bool {
        self.health == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead() && !self.has_died()
    }

    /// Visible, alive and flagged attackable.
    pub fn is_attackable(&self) -> bool {
        self.is_alive() && !self.hidden && self.capabilities.contains(Capabilities::ATTACKABLE)
    }

    pub fn is_enemy_of(&self, other: &Entity) -> bool {
        self.team != other.team
    }

    /// Summed bonus from inventory items and active buffs.
    pub fn bonus(&self, items: &dyn ItemOracle) -> StatBonus {
        let inventory = self
            .player
            .as_ref()
            .map(|player| player.inventory.bonus(items))
            .unwrap_or_default();
        inventory + self.buffs.bonus()
    }

    pub fn stats(&self, items: &dyn ItemOracle) -> EffectiveStats {
        EffectiveStats::compute(&self.base, self.level, &self.bonus(items))
    }

    pub fn health_max(&self, items: &dyn ItemOracle) -> u32 {
        self.stats(items).health_max
    }

    pub fn mana_max(&self, items: &dyn ItemOracle) -> u32 {
        self.stats(items).mana_max
    }

    /// Clamps vitals into `[0, max]`.
    pub fn clamp_vitals(&mut self, items: &dyn ItemOracle) {
        let stats = self.stats(items);
        self.health = self.health.min(stats.health_max);
        self.mana = self.mana.min(stats.mana_max);
    }

    pub fn restore_vitals(&mut self, items: &dyn ItemOracle) {
        let stats = self.stats(items);
        self.health = stats.health_max;
        self.mana = stats.mana_max;
    }

    /// Adds health and mana up to their maxima. Returns the amounts actually restored.
    pub fn heal(&mut self, health: u32, mana: u32, items: &dyn ItemOracle) -> (u32, u32) {
        let stats = self.stats(items);
        let before = (self.health, self.mana);
        self.health = self.health.saturating_add(health).min(stats.health_max);
        self.mana = self.mana.saturating_add(mana).min(stats.mana_max);
        (
            self.health.saturating_sub(before.0),
            self.mana.saturating_sub(before.1),
        )
    }

    /// Faces `point` if it is not directly above or below.
    pub fn face(&mut self, point: &Position) {
        if let Some(yaw) = self.position.yaw_toward(point) {
            self.yaw = yaw;
        }
    }

    /// Moves the deferred target, if any, into the active target.
    pub fn flush_next_target(&mut self) {
        if let Some(next) = self.next_target.take() {
            self.target = Some(next);
        }
    }
}
