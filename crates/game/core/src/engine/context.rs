use crate::env::{GameEnv, RollKind, compute_seed};
use crate::event::ArenaEvent;
use crate::nav::Navigator;
use crate::state::{EntityId, Timestamp};

/// Everything a single tick needs besides the entities themselves.
pub(crate) struct TickContext<'e, 'n> {
    pub env: GameEnv<'e>,
    pub nav: &'n mut dyn Navigator,
    pub now: Timestamp,
    pub game_seed: u64,
    pub nonce: u64,
    pub events: Vec<ArenaEvent>,
    /// Entities to remove once every entity has been stepped.
    pub despawn: Vec<EntityId>,
}

impl<'e, 'n> TickContext<'e, 'n> {
    pub fn new(
        env: GameEnv<'e>,
        nav: &'n mut dyn Navigator,
        now: Timestamp,
        game_seed: u64,
        nonce: u64,
    ) -> Self {
        Self {
            env,
            nav,
            now,
            game_seed,
            nonce,
            events: Vec::new(),
            despawn: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: ArenaEvent) {
        self.events.push(event);
    }

    /// Deterministic percentage roll for `actor` acting on `target`.
    pub fn roll(&self, actor: EntityId, target: EntityId, kind: RollKind, percent: u32) -> bool {
        let seed = compute_seed(self.game_seed, self.nonce, actor.0, target.0, kind);
        self.env.rng().chance(seed, percent)
    }
}
