//! Simulation worker that owns the authoritative [`arena_core::ArenaState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives
//! [`arena_core::GameEngine`] on a fixed tick, and publishes events to the
//! [`EventBus`].

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use arena_core::{
    ArenaEvent, ArenaState, ClientCommand, EntityId, EntitySnapshot, GameEngine, GameEnv,
    LinearNavigator, SpawnError, Team, Timestamp,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, SimulationEvent, SnapshotEvent, Topic};
use crate::oracle::OracleManager;

/// Commands that can be sent to the simulation worker
pub enum Command {
    SpawnPlayer {
        name: String,
        archetype: String,
        team: Team,
        reply: oneshot::Sender<Result<EntityId>>,
    },
    SpawnMonster {
        archetype: String,
        team: Team,
        reply: oneshot::Sender<Result<EntityId>>,
    },
    Despawn {
        entity: EntityId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Server-side inventory change, e.g. loot or a shop purchase.
    GrantItems {
        entity: EntityId,
        template: String,
        amount: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    TakeItems {
        entity: EntityId,
        template: String,
        amount: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Fire-and-forget client command, applied before the next tick.
    Submit {
        entity: EntityId,
        command: ClientCommand,
    },
    /// Run ticks immediately, regardless of the ticker.
    Advance {
        ticks: u32,
        reply: oneshot::Sender<Timestamp>,
    },
    QuerySnapshot {
        entity: EntityId,
        reply: oneshot::Sender<Option<EntitySnapshot>>,
    },
    QueryAll {
        reply: oneshot::Sender<Vec<EntitySnapshot>>,
    },
}

/// Background task that owns the arena and processes gameplay commands.
///
/// Commands and ticks are handled on the same task, so every command lands
/// strictly between two ticks.
pub struct SimulationWorker {
    state: ArenaState,
    nav: LinearNavigator,
    oracles: OracleManager,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_ms: u64,
    auto_tick: bool,
}

impl SimulationWorker {
    pub fn new(
        state: ArenaState,
        oracles: OracleManager,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_ms: u64,
        auto_tick: bool,
    ) -> Self {
        info!(
            seed = state.game_seed,
            tick_ms, auto_tick, "SimulationWorker initialized"
        );

        Self {
            state,
            nav: LinearNavigator::new(),
            oracles,
            command_rx,
            event_bus,
            tick_ms: tick_ms.max(1),
            auto_tick,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        let mut ticker = time::interval(Duration::from_millis(self.tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = ticker.tick(), if self.auto_tick => self.tick(),
            }
        }

        info!(now = %self.state.now, ticks = self.state.nonce, "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SpawnPlayer {
                name,
                archetype,
                team,
                reply,
            } => {
                let result = self.spawn(|engine, env, nav| {
                    engine.spawn_player(env, nav, &name, &archetype, team)
                });
                if reply.send(result).is_err() {
                    debug!("SpawnPlayer reply channel closed (caller dropped)");
                }
            }
            Command::SpawnMonster {
                archetype,
                team,
                reply,
            } => {
                let result =
                    self.spawn(|engine, env, nav| engine.spawn_monster(env, nav, &archetype, team));
                if reply.send(result).is_err() {
                    debug!("SpawnMonster reply channel closed (caller dropped)");
                }
            }
            Command::Despawn { entity, reply } => {
                let removed = GameEngine::new(&mut self.state).despawn(&mut self.nav, entity);
                let result = match removed {
                    Some(_) => {
                        self.publish(ArenaEvent::Despawned { entity });
                        Ok(())
                    }
                    None => Err(RuntimeError::UnknownEntity(entity)),
                };
                if reply.send(result).is_err() {
                    debug!("Despawn reply channel closed (caller dropped)");
                }
            }
            Command::GrantItems {
                entity,
                template,
                amount,
                reply,
            } => {
                let env = self.oracles.as_game_env();
                let result = GameEngine::new(&mut self.state)
                    .grant_items(env, entity, &template, amount)
                    .inspect_err(|error| warn!(%entity, item = %template, %error, "grant refused"))
                    .map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("GrantItems reply channel closed (caller dropped)");
                }
            }
            Command::TakeItems {
                entity,
                template,
                amount,
                reply,
            } => {
                let env = self.oracles.as_game_env();
                let result = GameEngine::new(&mut self.state)
                    .take_items(env, entity, &template, amount)
                    .map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("TakeItems reply channel closed (caller dropped)");
                }
            }
            Command::Submit { entity, command } => {
                let env = self.oracles.as_game_env();
                let name = command.name();
                if let Err(error) = GameEngine::new(&mut self.state).submit(env, entity, command) {
                    debug!(%entity, command = name, %error, "command rejected");
                }
            }
            Command::Advance { ticks, reply } => {
                for _ in 0..ticks {
                    self.tick();
                }
                if reply.send(self.state.now).is_err() {
                    debug!("Advance reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { entity, reply } => {
                let env = self.oracles.as_game_env();
                let snapshot = GameEngine::new(&mut self.state).snapshot(env, entity);
                if reply.send(snapshot).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::QueryAll { reply } => {
                let env = self.oracles.as_game_env();
                let snapshots = GameEngine::new(&mut self.state).snapshots(env);
                if reply.send(snapshots).is_err() {
                    debug!("QueryAll reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn spawn(
        &mut self,
        spawn: impl FnOnce(
            &mut GameEngine<'_>,
            GameEnv<'_>,
            &mut LinearNavigator,
        ) -> std::result::Result<EntityId, SpawnError>,
    ) -> Result<EntityId> {
        let env = self.oracles.as_game_env();
        let mut engine = GameEngine::new(&mut self.state);
        let id = spawn(&mut engine, env, &mut self.nav).inspect_err(|error| {
            warn!(%error, "spawn refused");
        })?;

        if let Some(entity) = self.state.entity(id) {
            let position = entity.position;
            self.publish(ArenaEvent::Spawned { entity: id, position });
        }
        Ok(id)
    }

    /// Runs one fixed-length tick and publishes what happened.
    fn tick(&mut self) {
        let now = self.state.now + self.tick_ms;
        self.nav.advance(self.tick_ms);

        let env = self.oracles.as_game_env();
        let mut engine = GameEngine::new(&mut self.state);
        let events = engine.tick(env, &mut self.nav, now);

        for event in events {
            self.publish(event);
        }

        if self.event_bus.has_subscribers(Topic::Snapshot) {
            let entities = GameEngine::new(&mut self.state).snapshots(env);
            self.event_bus.publish(Event::Snapshot(SnapshotEvent {
                tick: self.state.nonce,
                now: self.state.now,
                entities,
            }));
        }
    }

    fn publish(&self, event: ArenaEvent) {
        self.event_bus.publish(Event::Simulation(SimulationEvent {
            tick: self.state.nonce,
            now: self.state.now,
            event,
        }));
    }
}
