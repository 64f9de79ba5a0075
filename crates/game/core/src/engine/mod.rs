//! Authoritative tick loop and command entry points.
//!
//! The [`GameEngine`] is the only writer of [`ArenaState`]. Clients submit
//! commands between ticks; each tick then steps every entity once in id
//! order, despawns entities whose lifecycle ended, and returns the events
//! produced along the way.
mod commands;
mod context;
mod errors;
mod machine;

pub(crate) use context::TickContext;
pub use errors::{CommandError, SpawnError};

use tracing::{debug, info};

use crate::env::{ArchetypeTemplate, GameEnv, OracleError};
use crate::event::ArenaEvent;
use crate::nav::Navigator;
use crate::state::{
    ArenaState, ClientCommand, Entity, EntityId, EntityKind, EntitySnapshot, InventoryError,
    PlayerData, Team, Timestamp,
};

/// Borrowing handle that mutates an [`ArenaState`].
pub struct GameEngine<'a> {
    state: &'a mut ArenaState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut ArenaState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ArenaState {
        self.state
    }

    /// Spawns a player of `archetype` at its team's spawn point.
    pub fn spawn_player(
        &mut self,
        env: GameEnv<'_>,
        nav: &mut dyn Navigator,
        name: &str,
        archetype: &str,
        team: Team,
    ) -> Result<EntityId, SpawnError> {
        let template = Self::archetype(env, archetype)?;
        if template.kind != EntityKind::Player {
            return Err(SpawnError::WrongKind {
                archetype: template.name.clone(),
                kind: template.kind,
            });
        }
        let player = PlayerData::new(env.config().inventory_slots());
        self.spawn(env, nav, name, template, team, Some(player))
    }

    /// Spawns a non-player entity of `archetype`, named after it.
    pub fn spawn_monster(
        &mut self,
        env: GameEnv<'_>,
        nav: &mut dyn Navigator,
        archetype: &str,
        team: Team,
    ) -> Result<EntityId, SpawnError> {
        let template = Self::archetype(env, archetype)?;
        if template.kind == EntityKind::Player {
            return Err(SpawnError::WrongKind {
                archetype: template.name.clone(),
                kind: template.kind,
            });
        }
        self.spawn(env, nav, &template.name, template, team, None)
    }

    fn archetype<'e>(env: GameEnv<'e>, name: &str) -> Result<&'e ArchetypeTemplate, SpawnError> {
        env.archetypes()
            .archetype(name)
            .ok_or_else(|| OracleError::ArchetypeNotFound(name.to_string()).into())
    }

    fn spawn(
        &mut self,
        env: GameEnv<'_>,
        nav: &mut dyn Navigator,
        name: &str,
        template: &ArchetypeTemplate,
        team: Team,
        player: Option<PlayerData>,
    ) -> Result<EntityId, SpawnError> {
        let position = env
            .spawns()
            .spawn_point(team)
            .ok_or(SpawnError::NoSpawnPoint(team))?;
        let id = self
            .state
            .allocate_entity_id()
            .ok_or(SpawnError::IdsExhausted)?;

        let mut entity = Entity::from_archetype(id, name, template, team, position, player);
        entity.restore_vitals(env.items());
        entity.next_recovery = self.state.now + env.config().recovery_interval_ms;

        nav.add_agent(id, position, template.move_speed);
        info!(entity = %id, name = %name, archetype = %template.name, %team, "spawned");
        self.state.entities.insert(id, entity);
        Ok(id)
    }

    /// Removes an entity immediately, outside the tick.
    pub fn despawn(&mut self, nav: &mut dyn Navigator, id: EntityId) -> Option<Entity> {
        let entity = self.state.entities.remove(&id)?;
        nav.remove_agent(id);
        info!(entity = %id, "despawned");
        Some(entity)
    }

    /// Validates and records a client command.
    ///
    /// Refused commands leave the state untouched.
    pub fn submit(
        &mut self,
        env: GameEnv<'_>,
        id: EntityId,
        command: ClientCommand,
    ) -> Result<(), CommandError> {
        commands::apply_command(self.state, env, id, command)
    }

    /// Puts `amount` of item `template` into a living player's inventory,
    /// all or nothing.
    pub fn grant_items(
        &mut self,
        env: GameEnv<'_>,
        id: EntityId,
        template: &str,
        amount: u32,
    ) -> Result<(), CommandError> {
        let entity = self.living_player(id)?;
        let item = env
            .items()
            .item(template)
            .ok_or_else(|| InventoryError::UnknownTemplate(template.to_string()))?;
        if let Some(player) = entity.player.as_mut() {
            player.inventory.add(item, amount)?;
        }
        info!(entity = %id, item = %template, amount, "items granted");
        Ok(())
    }

    /// Takes `amount` of item `template` out of a living player's inventory,
    /// all or nothing. Vitals are clamped to the reduced bonuses.
    pub fn take_items(
        &mut self,
        env: GameEnv<'_>,
        id: EntityId,
        template: &str,
        amount: u32,
    ) -> Result<(), CommandError> {
        let entity = self.living_player(id)?;
        if let Some(player) = entity.player.as_mut() {
            player.inventory.remove(template, amount)?;
        }
        entity.clamp_vitals(env.items());
        info!(entity = %id, item = %template, amount, "items taken");
        Ok(())
    }

    fn living_player(&mut self, id: EntityId) -> Result<&mut Entity, CommandError> {
        let entity = self
            .state
            .entity_mut(id)
            .ok_or(CommandError::UnknownEntity(id))?;
        if !entity.is_alive() {
            return Err(CommandError::EntityDead(id));
        }
        if entity.player.is_none() {
            return Err(CommandError::NotAPlayer(id));
        }
        Ok(entity)
    }

    /// Advances the arena to `now` and returns the events of this tick.
    ///
    /// Authority time never runs backwards; an earlier `now` is treated as
    /// the last tick's time.
    pub fn tick(
        &mut self,
        env: GameEnv<'_>,
        nav: &mut dyn Navigator,
        now: Timestamp,
    ) -> Vec<ArenaEvent> {
        let now = now.max(self.state.now);
        self.state.now = now;
        self.state.nonce += 1;

        let mut cx = TickContext::new(env, nav, now, self.state.game_seed, self.state.nonce);
        for id in self.state.ids() {
            let Some(mut actor) = self.state.entities.remove(&id) else {
                continue;
            };
            machine::step(&mut actor, &mut self.state.entities, &mut cx);
            self.state.entities.insert(id, actor);
        }

        for id in std::mem::take(&mut cx.despawn) {
            if self.state.entities.remove(&id).is_some() {
                cx.nav.remove_agent(id);
                debug!(entity = %id, "despawned after disappearing");
                cx.emit(ArenaEvent::Despawned { entity: id });
            }
        }

        let items = env.items();
        for entity in self.state.entities.values_mut() {
            entity.clamp_vitals(items);
        }
        cx.events
    }

    pub fn snapshot(&self, env: GameEnv<'_>, id: EntityId) -> Option<EntitySnapshot> {
        self.state
            .entity(id)
            .map(|entity| EntitySnapshot::capture(entity, env.items()))
    }

    pub fn snapshots(&self, env: GameEnv<'_>) -> Vec<EntitySnapshot> {
        self.state
            .entities
            .values()
            .map(|entity| EntitySnapshot::capture(entity, env.items()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::GameConfig;
    use crate::env::{
        ItemTemplate, PcgRng, SkillEffect, SkillTemplate, SpawnPoints, TemplateRegistry,
    };
    use crate::nav::LinearNavigator;
    use crate::state::{EntityState, InventoryError, Position, SkillError};
    use crate::stats::{BaseStats, LinearStat, Reward, StatBonus};

    const BLUE: Team = Team(1);
    const RED: Team = Team(2);

    struct Content {
        registry: TemplateRegistry,
        spawns: SpawnPoints,
        rng: PcgRng,
        config: GameConfig,
    }

    impl Content {
        fn new() -> Self {
            Self::with_fireball(
                SkillTemplate::new(
                    "fireball",
                    SkillEffect::Damage {
                        amount: LinearStat::flat(5),
                    },
                    10.0,
                )
                .with_cast_time(1_000)
                .with_mana_cost(10)
                .cancel_if_target_died(),
            )
        }

        /// Skill index 1 of the knight is `fireball`.
        fn with_fireball(fireball: SkillTemplate) -> Self {
            let mut registry = TemplateRegistry::new();
            registry
                .add_item(ItemTemplate::potion("potion", 10, 30, 0))
                .unwrap();
            registry
                .add_skill(SkillTemplate::new(
                    "strike",
                    SkillEffect::Damage {
                        amount: LinearStat::flat(5),
                    },
                    2.0,
                ))
                .unwrap();
            registry.add_skill(fireball).unwrap();
            registry
                .add_skill(SkillTemplate::new(
                    "mend",
                    SkillEffect::Heal {
                        health: LinearStat::flat(20),
                        mana: LinearStat::flat(0),
                    },
                    5.0,
                ))
                .unwrap();
            registry
                .add_archetype(
                    ArchetypeTemplate::new(
                        "knight",
                        EntityKind::Player,
                        BaseStats {
                            health: LinearStat::new(100, 10),
                            mana: LinearStat::new(40, 5),
                            damage: LinearStat::new(10, 1),
                            ..BaseStats::default()
                        },
                    )
                    .with_skills(["strike", "fireball", "mend"]),
                )
                .unwrap();
            registry
                .add_archetype(
                    ArchetypeTemplate::new(
                        "goblin",
                        EntityKind::Monster,
                        BaseStats {
                            health: LinearStat::flat(30),
                            damage: LinearStat::flat(4),
                            ..BaseStats::default()
                        },
                    )
                    .with_skills(["strike"])
                    .with_kill_reward(Reward::new(100, 20)),
                )
                .unwrap();
            registry
                .add_archetype(
                    ArchetypeTemplate::new(
                        "totem",
                        EntityKind::Structure,
                        BaseStats {
                            health: LinearStat::flat(50),
                            ..BaseStats::default()
                        },
                    )
                    .without_respawn(),
                )
                .unwrap();

            Self {
                registry,
                spawns: SpawnPoints::new()
                    .with(BLUE, Position::ORIGIN)
                    .with(RED, Position::new(1.0, 0.0, 0.0)),
                rng: PcgRng,
                config: GameConfig::default(),
            }
        }

        fn env(&self) -> GameEnv<'_> {
            GameEnv::from_registry(&self.registry, &self.spawns, &self.rng, &self.config)
        }
    }

    fn knight_and_goblin(
        engine: &mut GameEngine<'_>,
        content: &Content,
        nav: &mut LinearNavigator,
    ) -> (EntityId, EntityId) {
        let knight = engine
            .spawn_player(content.env(), nav, "alice", "knight", BLUE)
            .unwrap();
        let goblin = engine
            .spawn_monster(content.env(), nav, "goblin", RED)
            .unwrap();
        (knight, goblin)
    }

    fn state_of(engine: &GameEngine<'_>, id: EntityId) -> EntityState {
        engine.state().entity(id).unwrap().state
    }

    #[test]
    fn spawn_requires_matching_kind_and_spawn_point() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(1);
        let mut engine = GameEngine::new(&mut state);

        assert_eq!(
            engine.spawn_player(content.env(), &mut nav, "bob", "goblin", BLUE),
            Err(SpawnError::WrongKind {
                archetype: "goblin".into(),
                kind: EntityKind::Monster,
            })
        );
        assert_eq!(
            engine.spawn_monster(content.env(), &mut nav, "goblin", Team(9)),
            Err(SpawnError::NoSpawnPoint(Team(9)))
        );
        assert_eq!(
            engine.spawn_monster(content.env(), &mut nav, "dragon", RED),
            Err(SpawnError::Oracle(OracleError::ArchetypeNotFound(
                "dragon".into()
            )))
        );

        let id = engine
            .spawn_player(content.env(), &mut nav, "bob", "knight", BLUE)
            .unwrap();
        let knight = engine.state().entity(id).unwrap();
        assert_eq!(knight.health, 100);
        assert_eq!(knight.mana, 40);
        assert_eq!(knight.state, EntityState::Idle);
        assert_eq!(
            knight.player.as_ref().unwrap().inventory.capacity(),
            content.config.inventory_slots()
        );
        assert_eq!(nav.position(id), Some(Position::ORIGIN));
    }

    #[test]
    fn cast_in_range_finishes_and_charges_mana() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(1))
            .unwrap_err();
        engine
            .submit(content.env(), knight, ClientCommand::LearnSkill(1))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(1))
            .unwrap();

        let events = engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, knight), EntityState::Casting);
        assert!(events.iter().any(|event| matches!(
            event,
            ArenaEvent::CastStarted { entity, skill: 1, ends_at, .. }
                if *entity == knight && *ends_at == Timestamp(1_100)
        )));

        engine.tick(content.env(), &mut nav, Timestamp(600));
        assert_eq!(state_of(&engine, knight), EntityState::Casting);
        assert_eq!(engine.state().entity(knight).unwrap().mana, 40);

        let events = engine.tick(content.env(), &mut nav, Timestamp(1_100));
        assert_eq!(state_of(&engine, knight), EntityState::Idle);
        assert_eq!(engine.state().entity(knight).unwrap().mana, 30);
        assert_eq!(engine.state().entity(goblin).unwrap().health, 15);
        assert!(events.iter().any(|event| matches!(
            event,
            ArenaEvent::Damaged { attacker, amount: 15, .. } if *attacker == knight
        )));
        let skill = engine.state().entity(knight).unwrap().skills.get(1).unwrap();
        assert_eq!(skill.cast_end, Timestamp::ZERO);
    }

    #[test]
    fn navigate_while_casting_aborts_and_flushes_target_once() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);
        let other = engine
            .spawn_monster(content.env(), &mut nav, "goblin", RED)
            .unwrap();

        engine
            .submit(content.env(), knight, ClientCommand::LearnSkill(1))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(1))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, knight), EntityState::Casting);

        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(other))
            .unwrap();
        let casting = engine.state().entity(knight).unwrap();
        assert_eq!(casting.target, Some(goblin));
        assert_eq!(casting.next_target, Some(other));

        engine
            .submit(
                content.env(),
                knight,
                ClientCommand::NavigateTo {
                    destination: Position::new(5.0, 0.0, 5.0),
                    stopping_distance: 0.0,
                },
            )
            .unwrap();
        let events = engine.tick(content.env(), &mut nav, Timestamp(200));

        let moving = engine.state().entity(knight).unwrap();
        assert_eq!(moving.state, EntityState::Moving);
        assert_eq!(moving.target, Some(other));
        assert_eq!(moving.next_target, None);
        assert_eq!(moving.current_skill, None);
        assert_eq!(moving.mana, 40);
        assert_eq!(nav.destination(knight), Some(Position::new(5.0, 0.0, 5.0)));
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, ArenaEvent::CastAborted { .. }))
                .count(),
            1
        );

        engine.tick(content.env(), &mut nav, Timestamp(300));
        assert_eq!(engine.state().entity(knight).unwrap().target, Some(other));
    }

    #[test]
    fn out_of_range_request_walks_toward_moving_target() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        nav.warp(goblin, Position::new(20.0, 0.0, 0.0));
        engine.tick(content.env(), &mut nav, Timestamp(50));

        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(0))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, knight), EntityState::Moving);
        let destination = nav.destination(knight).unwrap();
        assert!((destination.x - 18.4).abs() < 1e-4, "{destination:?}");

        nav.warp(goblin, Position::new(30.0, 0.0, 0.0));
        engine.tick(content.env(), &mut nav, Timestamp(150));
        engine.tick(content.env(), &mut nav, Timestamp(200));
        assert_eq!(state_of(&engine, knight), EntityState::Moving);
        let destination = nav.destination(knight).unwrap();
        assert!((destination.x - 28.4).abs() < 1e-4, "{destination:?}");
    }

    #[test]
    fn cancel_stops_a_chase_for_good() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        nav.warp(goblin, Position::new(20.0, 0.0, 0.0));
        engine.tick(content.env(), &mut nav, Timestamp(50));
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(0))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, knight), EntityState::Moving);

        engine
            .submit(content.env(), knight, ClientCommand::Cancel)
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(200));
        let stopped = engine.state().entity(knight).unwrap();
        assert_eq!(stopped.state, EntityState::Idle);
        assert_eq!(stopped.current_skill, None);
        assert_eq!(stopped.next_skill, None);

        engine.tick(content.env(), &mut nav, Timestamp(300));
        assert_eq!(state_of(&engine, knight), EntityState::Idle);
        assert_eq!(nav.destination(knight), None);
    }

    #[test]
    fn cast_aborts_when_target_dies_mid_cast() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine
            .submit(content.env(), knight, ClientCommand::LearnSkill(1))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(1))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, knight), EntityState::Casting);

        engine.state.entity_mut(goblin).unwrap().health = 0;
        let events = engine.tick(content.env(), &mut nav, Timestamp(200));

        let caster = engine.state().entity(knight).unwrap();
        assert_eq!(caster.state, EntityState::Idle);
        assert_eq!(caster.current_skill, None);
        assert_eq!(caster.mana, 40);
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::CastAborted { entity, skill: 1 } if *entity == knight
        )));
        assert!(!events.iter().any(|e| matches!(e, ArenaEvent::CastFinished { .. })));

        // Nothing left to finish once the cast time would have elapsed.
        let events = engine.tick(content.env(), &mut nav, Timestamp(1_100));
        assert!(!events.iter().any(|e| matches!(e, ArenaEvent::CastFinished { .. })));
        assert_eq!(engine.state().entity(knight).unwrap().mana, 40);
    }

    #[test]
    fn skill_queued_during_cast_continues_after_it() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        {
            let entity = engine.state.entity_mut(knight).unwrap();
            entity.skills.learn(1, 2, &content.registry).unwrap();
            entity.skills.learn(2, 2, &content.registry).unwrap();
        }
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(1))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, knight), EntityState::Casting);

        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(2))
            .unwrap();
        assert_eq!(engine.state().entity(knight).unwrap().next_skill, Some(2));

        let events = engine.tick(content.env(), &mut nav, Timestamp(1_100));
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::CastFinished { entity, skill: 1, .. } if *entity == knight
        )));
        let caster = engine.state().entity(knight).unwrap();
        assert_eq!(caster.state, EntityState::Idle);
        assert_eq!(caster.current_skill, Some(2));
        assert_eq!(caster.next_skill, None);
    }

    #[test]
    fn finished_cast_falls_back_to_default_attack_only_when_flagged() {
        fn finish(fireball: SkillTemplate) -> Option<usize> {
            let content = Content::with_fireball(fireball);

            let mut nav = LinearNavigator::new();
            let mut state = ArenaState::new(7);
            let mut engine = GameEngine::new(&mut state);
            let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);
            engine
                .submit(content.env(), knight, ClientCommand::LearnSkill(1))
                .unwrap();
            engine
                .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
                .unwrap();
            engine
                .submit(content.env(), knight, ClientCommand::UseSkill(1))
                .unwrap();
            engine.tick(content.env(), &mut nav, Timestamp(100));
            engine.tick(content.env(), &mut nav, Timestamp(1_100));
            engine.state().entity(knight).unwrap().current_skill
        }

        let plain = SkillTemplate::new(
            "fireball",
            SkillEffect::Damage {
                amount: LinearStat::flat(5),
            },
            10.0,
        )
        .with_cast_time(1_000);
        assert_eq!(finish(plain.clone()), None);
        assert_eq!(finish(plain.followed_by_default_attack()), Some(0));
    }

    #[test]
    fn death_while_casting_then_respawn_at_full_health() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine
            .submit(content.env(), knight, ClientCommand::LearnSkill(1))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(1))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));

        {
            let entity = engine.state.entity_mut(knight).unwrap();
            entity.health = 0;
            entity.player.as_mut().unwrap().gold = 200;
        }
        let events = engine.tick(content.env(), &mut nav, Timestamp(200));
        let dead = engine.state().entity(knight).unwrap();
        assert_eq!(dead.state, EntityState::Dead);
        assert_eq!(dead.current_skill, None);
        assert_eq!(dead.target, None);
        assert_eq!(dead.player.as_ref().unwrap().gold, 190);
        assert_eq!(dead.disappear_at, Timestamp(10_200));
        assert_eq!(dead.respawn_at, Timestamp(30_200));
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::CastAborted { .. })));
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::Died { entity } if *entity == knight)));

        assert_eq!(
            engine.submit(content.env(), knight, ClientCommand::Cancel),
            Err(CommandError::EntityDead(knight))
        );

        let events = engine.tick(content.env(), &mut nav, Timestamp(10_200));
        assert!(engine.state().entity(knight).unwrap().hidden);
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::Disappeared { .. })));

        nav.warp(knight, Position::new(4.0, 0.0, 4.0));
        let events = engine.tick(content.env(), &mut nav, Timestamp(30_200));
        let alive = engine.state().entity(knight).unwrap();
        assert_eq!(alive.state, EntityState::Idle);
        assert_eq!(alive.health, alive.health_max(content.env().items()));
        assert_eq!(alive.mana, alive.mana_max(content.env().items()));
        assert!(!alive.hidden);
        assert_eq!(alive.position, Position::ORIGIN);
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::Respawned { .. })));
    }

    #[test]
    fn late_tick_disappears_before_respawning() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (_, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine.state.entity_mut(goblin).unwrap().health = 0;
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, goblin), EntityState::Dead);

        let events = engine.tick(content.env(), &mut nav, Timestamp(100_000));
        let lifecycle: Vec<_> = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ArenaEvent::Disappeared { .. } | ArenaEvent::Respawned { .. }
                )
            })
            .collect();
        assert!(matches!(
            lifecycle.as_slice(),
            [ArenaEvent::Disappeared { entity: a }, ArenaEvent::Respawned { entity: b, .. }]
                if *a == goblin && *b == goblin
        ));
        let goblin = engine.state().entity(goblin).unwrap();
        assert_eq!(goblin.state, EntityState::Idle);
        assert!(!goblin.hidden);
    }

    #[test]
    fn killing_blow_pays_balanced_reward() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine.state.entity_mut(goblin).unwrap().health = 1;
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(0))
            .unwrap();

        engine.tick(content.env(), &mut nav, Timestamp(100));
        let events = engine.tick(content.env(), &mut nav, Timestamp(200));

        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::Rewarded { experience: 100, gold: 20, .. }
        )));
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::LeveledUp { level: 2, .. })));
        let killer = engine.state().entity(knight).unwrap();
        assert_eq!(killer.level, 2);
        assert_eq!(killer.player.as_ref().unwrap().experience, 0);
        assert_eq!(killer.player.as_ref().unwrap().gold, 20);
        assert_eq!(killer.current_skill, None);
        assert_eq!(state_of(&engine, goblin), EntityState::Dead);
        assert_eq!(killer.skills.spendable_points(killer.level), 2);
    }

    #[test]
    fn non_respawning_entity_is_despawned_after_disappearing() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let totem = engine
            .spawn_monster(content.env(), &mut nav, "totem", RED)
            .unwrap();

        engine.state.entity_mut(totem).unwrap().health = 0;
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(state_of(&engine, totem), EntityState::Dead);

        let events = engine.tick(content.env(), &mut nav, Timestamp(10_100));
        assert!(events.iter().any(|e| matches!(e, ArenaEvent::Despawned { entity } if *entity == totem)));
        assert!(engine.state().entity(totem).is_none());
        assert_eq!(nav.position(totem), None);
    }

    #[test]
    fn refused_commands_leave_state_untouched() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);
        let before = engine.state().clone();

        assert_eq!(
            engine.submit(content.env(), knight, ClientCommand::SetTarget(EntityId(99))),
            Err(CommandError::UnknownTarget(EntityId(99)))
        );
        assert_eq!(
            engine.submit(content.env(), knight, ClientCommand::UseSkill(2)),
            Err(CommandError::SkillNotLearned(2))
        );
        assert_eq!(
            engine.submit(content.env(), goblin, ClientCommand::SwapItems { from: 0, to: 1 }),
            Err(CommandError::NotAPlayer(goblin))
        );
        assert_eq!(
            engine.submit(content.env(), EntityId(42), ClientCommand::Cancel),
            Err(CommandError::UnknownEntity(EntityId(42)))
        );
        assert_eq!(
            engine.submit(content.env(), knight, ClientCommand::UseItem(0)),
            Err(CommandError::NotUsable(0))
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn skill_points_limit_learning() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, _) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine
            .submit(content.env(), knight, ClientCommand::LearnSkill(1))
            .unwrap();
        assert_eq!(
            engine.submit(content.env(), knight, ClientCommand::LearnSkill(2)),
            Err(CommandError::Skill(SkillError::NoSkillPoints))
        );
        assert_eq!(
            engine.submit(content.env(), knight, ClientCommand::UpgradeSkill(1)),
            Err(CommandError::Skill(SkillError::MaxLevel(1)))
        );
        let knight = engine.state().entity(knight).unwrap();
        assert_eq!(knight.skills.spendable_points(knight.level), 0);
    }

    #[test]
    fn using_a_potion_heals_and_consumes_one() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, _) = knight_and_goblin(&mut engine, &content, &mut nav);

        {
            let entity = engine.state.entity_mut(knight).unwrap();
            entity.health = 50;
            let potion = ItemTemplate::potion("potion", 10, 30, 0);
            entity
                .player
                .as_mut()
                .unwrap()
                .inventory
                .add(&potion, 2)
                .unwrap();
        }

        engine
            .submit(content.env(), knight, ClientCommand::UseItem(0))
            .unwrap();
        let entity = engine.state().entity(knight).unwrap();
        assert_eq!(entity.health, 80);
        assert_eq!(entity.player.as_ref().unwrap().inventory.count("potion"), 1);

        engine
            .submit(content.env(), knight, ClientCommand::UseItem(0))
            .unwrap();
        let entity = engine.state().entity(knight).unwrap();
        assert_eq!(entity.health, 100);
        assert_eq!(entity.player.as_ref().unwrap().inventory.count("potion"), 0);
    }

    #[test]
    fn granted_items_stack_split_and_merge() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        engine
            .grant_items(content.env(), knight, "potion", 7)
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::SplitStack { from: 0, to: 1 })
            .unwrap();
        let quantities = |engine: &GameEngine<'_>| {
            let player = engine.state().entity(knight).unwrap().player.as_ref().unwrap();
            (0..2)
                .map(|index| player.inventory.slot(index).map_or(0, |stack| stack.quantity))
                .collect::<Vec<_>>()
        };
        assert_eq!(quantities(&engine), vec![4, 3]);

        engine
            .submit(content.env(), knight, ClientCommand::MergeStacks { from: 1, to: 0 })
            .unwrap();
        assert_eq!(quantities(&engine), vec![7, 0]);

        engine
            .take_items(content.env(), knight, "potion", 2)
            .unwrap();
        assert_eq!(quantities(&engine), vec![5, 0]);

        let before = engine.state().clone();
        assert_eq!(
            engine.grant_items(content.env(), knight, "elixir", 1),
            Err(CommandError::Inventory(InventoryError::UnknownTemplate(
                "elixir".into()
            )))
        );
        assert_eq!(
            engine.take_items(content.env(), knight, "potion", 6),
            Err(CommandError::Inventory(InventoryError::NotEnough {
                template: "potion".into(),
                amount: 6,
            }))
        );
        assert_eq!(
            engine.grant_items(content.env(), goblin, "potion", 1),
            Err(CommandError::NotAPlayer(goblin))
        );
        assert_eq!(engine.state(), &before);

        engine.state.entity_mut(knight).unwrap().health = 0;
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(
            engine.grant_items(content.env(), knight, "potion", 1),
            Err(CommandError::EntityDead(knight))
        );
    }

    #[test]
    fn friendly_skill_falls_back_to_caster() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);
        let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);

        {
            let entity = engine.state.entity_mut(knight).unwrap();
            entity.health = 10;
            entity.skills.learn(2, 1, &content.registry).unwrap();
        }
        engine
            .submit(content.env(), knight, ClientCommand::SetTarget(goblin))
            .unwrap();
        engine
            .submit(content.env(), knight, ClientCommand::UseSkill(2))
            .unwrap();
        engine.tick(content.env(), &mut nav, Timestamp(100));

        let caster = engine.state().entity(knight).unwrap();
        assert_eq!(caster.target, Some(knight));
        assert_eq!(caster.next_target, Some(goblin));

        let events = engine.tick(content.env(), &mut nav, Timestamp(200));
        let caster = engine.state().entity(knight).unwrap();
        assert_eq!(caster.health, 30);
        assert_eq!(caster.target, Some(goblin));
        assert!(events.iter().any(|e| matches!(
            e,
            ArenaEvent::Healed { target, health: 20, .. } if *target == knight
        )));
    }

    #[test]
    fn ticks_are_deterministic_for_a_seed() {
        fn run(seed: u64) -> Vec<ArenaEvent> {
            let mut registry = TemplateRegistry::new();
            registry
                .add_skill(SkillTemplate::new(
                    "strike",
                    SkillEffect::Damage {
                        amount: LinearStat::flat(5),
                    },
                    2.0,
                ))
                .unwrap();
            // Block and critical chances high enough that rolls matter.
            registry
                .add_archetype(
                    ArchetypeTemplate::new(
                        "brute",
                        EntityKind::Monster,
                        BaseStats {
                            health: LinearStat::flat(500),
                            damage: LinearStat::flat(10),
                            block_chance: 30,
                            critical_chance: 30,
                            ..BaseStats::default()
                        },
                    )
                    .with_skills(["strike"]),
                )
                .unwrap();
            let content = Content {
                registry,
                ..Content::new()
            };

            let mut nav = LinearNavigator::new();
            let mut state = ArenaState::new(seed);
            let mut engine = GameEngine::new(&mut state);
            let a = engine
                .spawn_monster(content.env(), &mut nav, "brute", BLUE)
                .unwrap();
            let b = engine
                .spawn_monster(content.env(), &mut nav, "brute", RED)
                .unwrap();
            engine.state.entity_mut(a).unwrap().target = Some(b);
            engine.state.entity_mut(b).unwrap().target = Some(a);

            let mut events = Vec::new();
            for tick in 1..=40u64 {
                for id in [a, b] {
                    let _ = engine.submit(content.env(), id, ClientCommand::UseSkill(0));
                }
                events.extend(engine.tick(content.env(), &mut nav, Timestamp(tick * 100)));
            }
            events
        }

        let first = run(11);
        assert_eq!(first, run(11));
        assert!(first.iter().any(|e| matches!(e, ArenaEvent::Damaged { .. })));
    }

    #[test]
    fn tick_time_never_runs_backwards() {
        let content = Content::new();
        let mut nav = LinearNavigator::new();
        let mut state = ArenaState::new(7);
        let mut engine = GameEngine::new(&mut state);

        engine.tick(content.env(), &mut nav, Timestamp(500));
        engine.tick(content.env(), &mut nav, Timestamp(100));
        assert_eq!(engine.state().now, Timestamp(500));
        assert_eq!(engine.state().nonce, 2);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Advance(u16),
        Navigate(f32, f32),
        Skill(usize),
        Target(bool),
        Cancel,
        Hurt(u32),
        Buff(i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u16..2_000).prop_map(Op::Advance),
            (-20.0f32..20.0, -20.0f32..20.0).prop_map(|(x, z)| Op::Navigate(x, z)),
            (0usize..3).prop_map(Op::Skill),
            any::<bool>().prop_map(Op::Target),
            Just(Op::Cancel),
            (0u32..150).prop_map(Op::Hurt),
            (-200i32..200).prop_map(Op::Buff),
        ]
    }

    proptest! {
        #[test]
        fn vitals_stay_within_bounds(ops in prop::collection::vec(op(), 1..60)) {
            let content = Content::new();
            let mut nav = LinearNavigator::new();
            let mut state = ArenaState::new(3);
            let mut engine = GameEngine::new(&mut state);
            let (knight, goblin) = knight_and_goblin(&mut engine, &content, &mut nav);
            engine.state.entity_mut(knight).unwrap().skills.learn(1, 1, &content.registry).unwrap();
            let mut now = 0u64;

            for op in ops {
                let ticked = matches!(op, Op::Advance(_));
                match op {
                    Op::Advance(ms) => {
                        now += u64::from(ms);
                        nav.advance(u64::from(ms));
                        engine.tick(content.env(), &mut nav, Timestamp(now));
                    }
                    Op::Navigate(x, z) => {
                        let _ = engine.submit(content.env(), knight, ClientCommand::NavigateTo {
                            destination: Position::new(x, 0.0, z),
                            stopping_distance: 0.5,
                        });
                    }
                    Op::Skill(index) => {
                        let _ = engine.submit(content.env(), knight, ClientCommand::UseSkill(index));
                    }
                    Op::Target(enemy) => {
                        let target = if enemy { goblin } else { knight };
                        let _ = engine.submit(content.env(), knight, ClientCommand::SetTarget(target));
                    }
                    Op::Cancel => {
                        let _ = engine.submit(content.env(), knight, ClientCommand::Cancel);
                    }
                    Op::Hurt(amount) => {
                        if let Some(entity) = engine.state.entity_mut(goblin) {
                            entity.health = entity.health.saturating_sub(amount);
                        }
                    }
                    Op::Buff(health) => {
                        if let Some(entity) = engine.state.entity_mut(knight) {
                            let bonus = StatBonus::ZERO.with_health_max(health);
                            entity.buffs.apply(crate::state::Buff::new("test", bonus, Timestamp(now + 500)));
                        }
                    }
                }

                let items = content.env().items();
                for entity in engine.state().entities.values() {
                    if ticked {
                        prop_assert!(entity.health <= entity.health_max(items));
                        prop_assert!(entity.mana <= entity.mana_max(items));
                    }
                    if entity.state == EntityState::Dead {
                        prop_assert_eq!(entity.health, 0);
                    }
                }
            }
        }
    }
}
