//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{SimulationEvent, SnapshotEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// State transitions, casts, hits, deaths, respawns, rewards
    Simulation,
    /// Per-tick observable snapshots
    Snapshot,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Simulation(SimulationEvent),
    Snapshot(SnapshotEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Simulation(_) => Topic::Simulation,
            Event::Snapshot(_) => Topic::Snapshot,
        }
    }

    /// JSON payload for observers that do not speak Rust types.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. The set of topics is fixed at construction.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

struct Channels {
    simulation: broadcast::Sender<Event>,
    snapshot: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                simulation: broadcast::channel(capacity).0,
                snapshot: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Simulation => &self.channels.simulation,
            Topic::Snapshot => &self.channels.snapshot,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Whether anyone currently listens on `topic`.
    pub fn has_subscribers(&self, topic: Topic) -> bool {
        self.sender(topic).receiver_count() > 0
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{ArenaEvent, EntityId, Timestamp};

    use super::*;

    fn died(entity: u32) -> Event {
        Event::Simulation(SimulationEvent {
            tick: 1,
            now: Timestamp(100),
            event: ArenaEvent::Died {
                entity: EntityId(entity),
            },
        })
    }

    #[tokio::test]
    async fn routes_events_by_topic() {
        let bus = EventBus::with_capacity(8);
        let mut simulation = bus.subscribe(Topic::Simulation);
        let mut snapshots = bus.subscribe(Topic::Snapshot);

        bus.publish(died(3));
        bus.publish(Event::Snapshot(SnapshotEvent {
            tick: 1,
            now: Timestamp(100),
            entities: Vec::new(),
        }));

        assert!(matches!(simulation.recv().await.unwrap(), Event::Simulation(_)));
        assert!(matches!(snapshots.recv().await.unwrap(), Event::Snapshot(_)));
        assert!(simulation.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        assert!(!bus.has_subscribers(Topic::Simulation));
        bus.publish(died(1));

        let _rx = bus.clone().subscribe(Topic::Simulation);
        assert!(bus.has_subscribers(Topic::Simulation));
    }

    #[test]
    fn events_render_as_json() {
        let json = died(7).to_json().unwrap();
        assert!(json.contains("Died"), "{json}");
        assert!(json.contains("\"tick\":1"), "{json}");
    }
}
