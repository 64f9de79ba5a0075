use crate::stats::StatBonus;

/// Read access to item templates by stable name key.
pub trait ItemOracle: Send + Sync {
    /// Returns `None` when no template with that name exists.
    fn item(&self, name: &str) -> Option<&ItemTemplate>;
}

/// Item category. Only [`ItemCategory::Consumable`] items have a use effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Consumable,
    Equipment,
    #[default]
    Material,
    Quest,
}

impl ItemCategory {
    pub const fn is_consumable(self) -> bool {
        matches!(self, Self::Consumable)
    }
}

/// Static, shared definition of an item kind.
///
/// The name is the identity of the template and must be unique within a
/// registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: ItemCategory,
    /// Largest quantity a single slot may hold (at least 1).
    pub max_stack: u16,
    /// Contribution to the holder's stats while the item sits in a valid slot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonus: StatBonus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub restores_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub restores_mana: u32,
    /// Using the item removes one from the stack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub consume_on_use: bool,
}

impl ItemTemplate {
    pub fn new(name: impl Into<String>, category: ItemCategory, max_stack: u16) -> Self {
        Self {
            name: name.into(),
            category,
            max_stack: max_stack.max(1),
            bonus: StatBonus::ZERO,
            restores_health: 0,
            restores_mana: 0,
            consume_on_use: false,
        }
    }

    /// A stackable potion that restores vitals and is consumed on use.
    pub fn potion(name: impl Into<String>, max_stack: u16, health: u32, mana: u32) -> Self {
        Self {
            restores_health: health,
            restores_mana: mana,
            consume_on_use: true,
            ..Self::new(name, ItemCategory::Consumable, max_stack)
        }
    }

    pub fn with_bonus(mut self, bonus: StatBonus) -> Self {
        self.bonus = bonus;
        self
    }

    /// Stack limit, never below one even for malformed content.
    pub fn stack_limit(&self) -> u16 {
        self.max_stack.max(1)
    }
}
