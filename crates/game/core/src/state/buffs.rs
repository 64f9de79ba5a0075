//! Timed stat modifiers.
//!
//! Buffs store `expires_at` as an absolute timestamp and are removed when
//! `now >= expires_at`.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::Timestamp;
use crate::stats::StatBonus;

/// A single timed bonus, keyed by the skill that applied it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub source: String,
    pub bonus: StatBonus,
    pub expires_at: Timestamp,
}

impl Buff {
    pub fn new(source: impl Into<String>, bonus: StatBonus, expires_at: Timestamp) -> Self {
        Self {
            source: source.into(),
            bonus,
            expires_at,
        }
    }
}

/// Active buffs on an entity, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buffs {
    buffs: ArrayVec<Buff, { GameConfig::MAX_BUFFS }>,
}

impl Buffs {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds or refreshes a buff.
    ///
    /// Re-applying a buff from the same source replaces its bonus and keeps
    /// the later expiry. Returns false when the collection is full.
    pub fn apply(&mut self, buff: Buff) -> bool {
        if let Some(existing) = self.buffs.iter_mut().find(|b| b.source == buff.source) {
            existing.bonus = buff.bonus;
            existing.expires_at = existing.expires_at.max(buff.expires_at);
            return true;
        }
        self.buffs.try_push(buff).is_ok()
    }

    /// Drops expired buffs and returns how many were removed.
    pub fn expire(&mut self, now: Timestamp) -> usize {
        let before = self.buffs.len();
        self.buffs.retain(|buff| buff.expires_at > now);
        before - self.buffs.len()
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
    }

    pub fn bonus(&self) -> StatBonus {
        self.buffs.iter().map(|buff| buff.bonus).sum()
    }

    pub fn get(&self, source: &str) -> Option<&Buff> {
        self.buffs.iter().find(|buff| buff.source == source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}
