//! Client intents.
//!
//! Cancel and navigate are latched as flags and consumed exactly once by the
//! state machine on the tick that observes them. Repeated requests between
//! ticks collapse into one, with the latest navigate destination winning.

use bitflags::bitflags;

use crate::state::{EntityId, Position};

bitflags! {
    /// Latched command kinds awaiting the next tick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CommandFlags: u8 {
        const CANCEL   = 1 << 0;
        const NAVIGATE = 1 << 1;
    }
}

/// Destination of a pending navigate command.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigateRequest {
    pub destination: Position,
    pub stopping_distance: f32,
}

/// Pending command set of one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCommands {
    flags: CommandFlags,
    navigate: Option<NavigateRequest>,
}

impl PendingCommands {
    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn raise_cancel(&mut self) {
        self.flags.insert(CommandFlags::CANCEL);
    }

    pub fn request_navigate(&mut self, destination: Position, stopping_distance: f32) {
        self.flags.insert(CommandFlags::NAVIGATE);
        self.navigate = Some(NavigateRequest {
            destination,
            stopping_distance: stopping_distance.max(0.0),
        });
    }

    /// Consumes the cancel flag.
    pub fn take_cancel(&mut self) -> bool {
        let raised = self.flags.contains(CommandFlags::CANCEL);
        self.flags.remove(CommandFlags::CANCEL);
        raised
    }

    /// Consumes the navigate flag and its destination.
    pub fn take_navigate(&mut self) -> Option<NavigateRequest> {
        if !self.flags.contains(CommandFlags::NAVIGATE) {
            return None;
        }
        self.flags.remove(CommandFlags::NAVIGATE);
        self.navigate.take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Requests a client may submit for the entity it controls.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientCommand {
    NavigateTo {
        destination: Position,
        stopping_distance: f32,
    },
    SetTarget(EntityId),
    UseSkill(usize),
    Cancel,
    SwapItems { from: usize, to: usize },
    SplitStack { from: usize, to: usize },
    MergeStacks { from: usize, to: usize },
    UseItem(usize),
    LearnSkill(usize),
    UpgradeSkill(usize),
}

impl ClientCommand {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NavigateTo { .. } => "navigate_to",
            Self::SetTarget(_) => "set_target",
            Self::UseSkill(_) => "use_skill",
            Self::Cancel => "cancel",
            Self::SwapItems { .. } => "swap_items",
            Self::SplitStack { .. } => "split_stack",
            Self::MergeStacks { .. } => "merge_stacks",
            Self::UseItem(_) => "use_item",
            Self::LearnSkill(_) => "learn_skill",
            Self::UpgradeSkill(_) => "upgrade_skill",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_consumed_once() {
        let mut pending = PendingCommands::default();
        pending.raise_cancel();
        pending.raise_cancel();

        assert!(pending.take_cancel());
        assert!(!pending.take_cancel());
    }

    #[test]
    fn latest_navigate_wins() {
        let mut pending = PendingCommands::default();
        pending.request_navigate(Position::new(1.0, 0.0, 0.0), 0.5);
        pending.request_navigate(Position::new(9.0, 0.0, 0.0), 0.5);

        let request = pending.take_navigate().unwrap();
        assert_eq!(request.destination, Position::new(9.0, 0.0, 0.0));
        assert!(pending.take_navigate().is_none());
        assert!(pending.is_empty());
    }
}
