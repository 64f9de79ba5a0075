//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! spawning entities, granting items, forwarding client commands, querying
//! snapshots, and streaming events from specific topics. This is the surface the network
//! and session layer talks to.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use arena_core::{ClientCommand, EntityId, EntitySnapshot, Team, Timestamp};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Spawn a player of `archetype` at its team's spawn point.
    pub async fn spawn_player(
        &self,
        name: impl Into<String>,
        archetype: impl Into<String>,
        team: Team,
    ) -> Result<EntityId> {
        let (name, archetype) = (name.into(), archetype.into());
        self.request(|reply| Command::SpawnPlayer {
            name,
            archetype,
            team,
            reply,
        })
        .await?
    }

    /// Spawn a monster, structure, or NPC of `archetype`.
    pub async fn spawn_monster(&self, archetype: impl Into<String>, team: Team) -> Result<EntityId> {
        let archetype = archetype.into();
        self.request(|reply| Command::SpawnMonster {
            archetype,
            team,
            reply,
        })
        .await?
    }

    /// Remove an entity right away, e.g. when its session disconnects.
    pub async fn despawn(&self, entity: EntityId) -> Result<()> {
        self.request(|reply| Command::Despawn { entity, reply })
            .await?
    }

    /// Put `amount` of item `template` into a living player's inventory.
    pub async fn grant_items(
        &self,
        entity: EntityId,
        template: impl Into<String>,
        amount: u32,
    ) -> Result<()> {
        let template = template.into();
        self.request(|reply| Command::GrantItems {
            entity,
            template,
            amount,
            reply,
        })
        .await?
    }

    /// Take `amount` of item `template` out of a living player's inventory.
    pub async fn take_items(
        &self,
        entity: EntityId,
        template: impl Into<String>,
        amount: u32,
    ) -> Result<()> {
        let template = template.into();
        self.request(|reply| Command::TakeItems {
            entity,
            template,
            amount,
            reply,
        })
        .await?
    }

    /// Forward a client command.
    ///
    /// Only fails when the worker is gone. Invalid commands are dropped by the
    /// worker without a reply.
    pub async fn submit(&self, entity: EntityId, command: ClientCommand) -> Result<()> {
        self.command_tx
            .send(Command::Submit { entity, command })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Run `ticks` ticks immediately and return the authority time reached.
    ///
    /// Meant for runtimes built with automatic ticking disabled.
    pub async fn advance(&self, ticks: u32) -> Result<Timestamp> {
        self.request(|reply| Command::Advance { ticks, reply }).await
    }

    /// Query the observable state of one entity
    pub async fn query_snapshot(&self, entity: EntityId) -> Result<Option<EntitySnapshot>> {
        self.request(|reply| Command::QuerySnapshot { entity, reply })
            .await
    }

    /// Query the observable state of every entity, ordered by id
    pub async fn query_all(&self) -> Result<Vec<EntitySnapshot>> {
        self.request(|reply| Command::QueryAll { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Simulation` - transitions, hits, deaths, respawns, rewards
    /// - `Topic::Snapshot` - observable state of every entity after each tick
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
