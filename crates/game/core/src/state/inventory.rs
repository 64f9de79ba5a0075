//! Inventory ledger.
//!
//! A fixed number of slots, each empty or holding one [`ItemStack`]. Every
//! operation validates fully before mutating, so a rejected call leaves the
//! ledger untouched.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::env::{ItemOracle, ItemTemplate};
use crate::error::{ErrorSeverity, GameError};
use crate::state::ItemStack;
use crate::stats::StatBonus;

/// Reasons an inventory operation was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    #[error("slot {index} is out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },

    #[error("source and destination slot are both {0}")]
    SameSlot(usize),

    #[error("slot {0} is empty")]
    EmptySlot(usize),

    #[error("slot {0} is occupied")]
    OccupiedSlot(usize),

    #[error("slot {0} holds fewer than two items")]
    NothingToSplit(usize),

    #[error("slots {0} and {1} hold different items")]
    DifferentItems(usize, usize),

    #[error("slot {0} is already full")]
    StackFull(usize),

    #[error("item template '{0}' not found")]
    UnknownTemplate(String),

    #[error("not enough room for {amount} x {template}")]
    NoRoom { template: String, amount: u32 },

    #[error("fewer than {amount} x {template} held")]
    NotEnough { template: String, amount: u32 },
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTemplate(_) => ErrorSeverity::Internal,
            Self::NoRoom { .. } | Self::NotEnough { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotOutOfRange { .. } => "INVENTORY_SLOT_OUT_OF_RANGE",
            Self::SameSlot(_) => "INVENTORY_SAME_SLOT",
            Self::EmptySlot(_) => "INVENTORY_EMPTY_SLOT",
            Self::OccupiedSlot(_) => "INVENTORY_OCCUPIED_SLOT",
            Self::NothingToSplit(_) => "INVENTORY_NOTHING_TO_SPLIT",
            Self::DifferentItems(..) => "INVENTORY_DIFFERENT_ITEMS",
            Self::StackFull(_) => "INVENTORY_STACK_FULL",
            Self::UnknownTemplate(_) => "INVENTORY_UNKNOWN_TEMPLATE",
            Self::NoRoom { .. } => "INVENTORY_NO_ROOM",
            Self::NotEnough { .. } => "INVENTORY_NOT_ENOUGH",
        }
    }
}

/// Fixed-size slot array owned by a single player.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: ArrayVec<Option<ItemStack>, { GameConfig::MAX_INVENTORY_SLOTS }>,
}

impl Inventory {
    /// Creates `capacity` empty slots, capped at [`GameConfig::MAX_INVENTORY_SLOTS`].
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = ArrayVec::new();
        for _ in 0..capacity.min(GameConfig::MAX_INVENTORY_SLOTS) {
            slots.push(None);
        }
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> impl Iterator<Item = Option<&ItemStack>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Total quantity of `template` across all slots.
    pub fn count(&self, template: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.template == template)
            .map(|stack| u32::from(stack.quantity))
            .sum()
    }

    /// Whether the entire `amount` fits, topping up existing stacks first and
    /// then filling empty slots.
    pub fn can_add(&self, template: &ItemTemplate, amount: u32) -> bool {
        if amount == 0 {
            return false;
        }
        let limit = u32::from(template.stack_limit());
        let mut remaining = amount;

        for stack in self.slots.iter().flatten() {
            if stack.template == template.name {
                let free = limit.saturating_sub(u32::from(stack.quantity));
                remaining = remaining.saturating_sub(free);
            }
        }
        for _ in self.slots.iter().filter(|slot| slot.is_none()) {
            if remaining == 0 {
                break;
            }
            remaining = remaining.saturating_sub(limit);
        }

        remaining == 0
    }

    /// Adds `amount` of `template`, all or nothing.
    pub fn add(&mut self, template: &ItemTemplate, amount: u32) -> Result<(), InventoryError> {
        if !self.can_add(template, amount) {
            return Err(InventoryError::NoRoom {
                template: template.name.clone(),
                amount,
            });
        }

        let limit = template.stack_limit();
        let mut remaining = amount;

        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.template == template.name && stack.quantity < limit {
                let moved = remaining.min(u32::from(limit - stack.quantity)) as u16;
                stack.quantity += moved;
                remaining -= u32::from(moved);
            }
        }
        for slot in self.slots.iter_mut().filter(|slot| slot.is_none()) {
            if remaining == 0 {
                break;
            }
            let moved = remaining.min(u32::from(limit)) as u16;
            *slot = Some(ItemStack::new(template.name.clone(), moved));
            remaining -= u32::from(moved);
        }

        Ok(())
    }

    /// Removes `amount` of `template`, all or nothing. Later slots drain first.
    pub fn remove(&mut self, template: &str, amount: u32) -> Result<(), InventoryError> {
        if amount == 0 || self.count(template) < amount {
            return Err(InventoryError::NotEnough {
                template: template.to_string(),
                amount,
            });
        }
        let mut remaining = amount;
        for slot in self.slots.iter_mut().rev() {
            if remaining == 0 {
                break;
            }
            let Some(stack) = slot else { continue };
            if stack.template != template {
                continue;
            }
            let taken = remaining.min(u32::from(stack.quantity)) as u16;
            stack.quantity -= taken;
            remaining -= u32::from(taken);
            if stack.quantity == 0 {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Removes a single item from slot `index`, emptying the slot at zero.
    pub fn take_one(&mut self, index: usize) -> Result<ItemStack, InventoryError> {
        self.check_index(index)?;
        let slot = &mut self.slots[index];
        let Some(stack) = slot else {
            return Err(InventoryError::EmptySlot(index));
        };
        let taken = ItemStack::new(stack.template.clone(), 1);
        stack.quantity -= 1;
        if stack.quantity == 0 {
            *slot = None;
        }
        Ok(taken)
    }

    pub fn swap(&mut self, from: usize, to: usize) -> Result<(), InventoryError> {
        self.check_pair(from, to)?;
        self.slots.swap(from, to);
        Ok(())
    }

    /// Moves `floor(n / 2)` of a stack into an empty slot; the source keeps the rest.
    pub fn split(&mut self, from: usize, to: usize) -> Result<(), InventoryError> {
        self.check_pair(from, to)?;
        if self.slots[to].is_some() {
            return Err(InventoryError::OccupiedSlot(to));
        }
        let Some(source) = self.slots[from].as_mut() else {
            return Err(InventoryError::EmptySlot(from));
        };
        if source.quantity < 2 {
            return Err(InventoryError::NothingToSplit(from));
        }

        let moved = source.quantity / 2;
        source.quantity -= moved;
        let split = ItemStack::new(source.template.clone(), moved);
        self.slots[to] = Some(split);
        Ok(())
    }

    /// Tops up the destination stack from the source, up to the template's stack limit.
    pub fn merge(
        &mut self,
        from: usize,
        to: usize,
        items: &dyn ItemOracle,
    ) -> Result<(), InventoryError> {
        self.check_pair(from, to)?;
        let (Some(source), Some(dest)) = (&self.slots[from], &self.slots[to]) else {
            let empty = if self.slots[from].is_none() { from } else { to };
            return Err(InventoryError::EmptySlot(empty));
        };
        if !source.is_same_kind(dest) {
            return Err(InventoryError::DifferentItems(from, to));
        }
        let limit = items
            .item(&dest.template)
            .map(ItemTemplate::stack_limit)
            .ok_or_else(|| InventoryError::UnknownTemplate(dest.template.clone()))?;
        let free = limit.saturating_sub(dest.quantity);
        if free == 0 {
            return Err(InventoryError::StackFull(to));
        }

        let moved = free.min(source.quantity);
        if let Some(dest) = self.slots[to].as_mut() {
            dest.quantity += moved;
        }
        if let Some(source) = self.slots[from].as_mut() {
            source.quantity -= moved;
            if source.quantity == 0 {
                self.slots[from] = None;
            }
        }
        Ok(())
    }

    /// Sum of item bonuses over occupied slots.
    ///
    /// Each occupied slot contributes its template's bonus once. Slots whose
    /// template no longer exists contribute nothing.
    pub fn bonus(&self, items: &dyn ItemOracle) -> StatBonus {
        self.slots
            .iter()
            .flatten()
            .filter_map(|stack| items.item(&stack.template))
            .map(|template| template.bonus)
            .sum()
    }

    fn check_index(&self, index: usize) -> Result<(), InventoryError> {
        if index >= self.slots.len() {
            return Err(InventoryError::SlotOutOfRange {
                index,
                capacity: self.slots.len(),
            });
        }
        Ok(())
    }

    fn check_pair(&self, from: usize, to: usize) -> Result<(), InventoryError> {
        if from == to {
            return Err(InventoryError::SameSlot(from));
        }
        self.check_index(from)?;
        self.check_index(to)
    }
}
