//! Navigation contract.
//!
//! Path planning is an external service. The state machine only issues
//! destinations, stops agents, teleports them, and asks whether they have
//! arrived. [`LinearNavigator`] is a straight-line implementation for the
//! authority process and tests.

use std::collections::HashMap;

use crate::state::{EntityId, Position};

/// Opaque "navigate to point, report arrival" service.
pub trait Navigator: Send {
    /// Registers an agent at `position` moving at `speed` units per second.
    fn add_agent(&mut self, id: EntityId, position: Position, speed: f32);

    /// Removes an agent. Unknown ids are ignored.
    fn remove_agent(&mut self, id: EntityId);

    fn set_destination(&mut self, id: EntityId, destination: Position, stopping_distance: f32);

    /// Stops the agent where it stands.
    fn reset_path(&mut self, id: EntityId);

    /// True when the agent has no path or is within stopping distance of it.
    fn has_arrived(&self, id: EntityId) -> bool;

    /// Instant teleport that bypasses pathing and clears any path.
    fn warp(&mut self, id: EntityId, position: Position);

    fn position(&self, id: EntityId) -> Option<Position>;

    /// Current destination, if moving.
    fn destination(&self, id: EntityId) -> Option<Position>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Agent {
    position: Position,
    speed: f32,
    path: Option<(Position, f32)>,
}

impl Agent {
    fn arrived(&self) -> bool {
        match self.path {
            None => true,
            Some((destination, stopping)) => self.position.distance(&destination) <= stopping,
        }
    }
}

/// Moves agents along straight lines at constant speed.
#[derive(Clone, Debug, Default)]
pub struct LinearNavigator {
    agents: HashMap<EntityId, Agent>,
}

impl LinearNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every moving agent by `elapsed_ms`.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let seconds = elapsed_ms as f32 / 1000.0;
        for agent in self.agents.values_mut() {
            let Some((destination, stopping)) = agent.path else {
                continue;
            };
            let remaining = agent.position.distance(&destination) - stopping;
            if remaining > 0.0 {
                let step = (agent.speed * seconds).min(remaining);
                agent.position = agent.position.step_toward(&destination, step);
            }
            if agent.arrived() {
                agent.path = None;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Navigator for LinearNavigator {
    fn add_agent(&mut self, id: EntityId, position: Position, speed: f32) {
        self.agents.insert(
            id,
            Agent {
                position,
                speed: speed.max(0.0),
                path: None,
            },
        );
    }

    fn remove_agent(&mut self, id: EntityId) {
        self.agents.remove(&id);
    }

    fn set_destination(&mut self, id: EntityId, destination: Position, stopping_distance: f32) {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.path = Some((destination, stopping_distance.max(0.0)));
        }
    }

    fn reset_path(&mut self, id: EntityId) {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.path = None;
        }
    }

    fn has_arrived(&self, id: EntityId) -> bool {
        self.agents.get(&id).is_none_or(Agent::arrived)
    }

    fn warp(&mut self, id: EntityId, position: Position) {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.position = position;
            agent.path = None;
        }
    }

    fn position(&self, id: EntityId) -> Option<Position> {
        self.agents.get(&id).map(|agent| agent.position)
    }

    fn destination(&self, id: EntityId) -> Option<Position> {
        self.agents
            .get(&id)
            .and_then(|agent| agent.path)
            .map(|(destination, _)| destination)
    }
}
