use crate::state::{Capabilities, EntityKind};
use crate::stats::{BaseStats, Reward};

/// Read access to spawnable archetypes by stable name key.
pub trait ArchetypeOracle: Send + Sync {
    fn archetype(&self, name: &str) -> Option<&ArchetypeTemplate>;
}

/// Everything needed to instantiate an entity of a given kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeTemplate {
    pub name: String,
    pub kind: EntityKind,
    #[cfg_attr(feature = "serde", serde(default = "Capabilities::combatant"))]
    pub capabilities: Capabilities,
    pub base: BaseStats,
    /// Units per second for the navigation agent.
    #[cfg_attr(feature = "serde", serde(default = "default_move_speed"))]
    pub move_speed: f32,
    /// Skill template names. Index 0 is the default attack and is learned on spawn.
    pub skills: Vec<String>,
    /// Base reward for killing this archetype (monsters).
    #[cfg_attr(feature = "serde", serde(default))]
    pub kill_reward: Reward,
    #[cfg_attr(feature = "serde", serde(default = "default_respawns"))]
    pub respawns: bool,
}

#[cfg(feature = "serde")]
fn default_move_speed() -> f32 {
    ArchetypeTemplate::DEFAULT_MOVE_SPEED
}

#[cfg(feature = "serde")]
fn default_respawns() -> bool {
    true
}

impl ArchetypeTemplate {
    pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

    pub fn new(name: impl Into<String>, kind: EntityKind, base: BaseStats) -> Self {
        Self {
            name: name.into(),
            kind,
            capabilities: Capabilities::combatant(),
            base,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            skills: Vec::new(),
            kill_reward: Reward::default(),
            respawns: true,
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_kill_reward(mut self, reward: Reward) -> Self {
        self.kill_reward = reward;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn without_respawn(mut self) -> Self {
        self.respawns = false;
        self
    }
}
