//! Death handling.
//!
//! Death records two absolute timestamps instead of scheduling callbacks:
//! `disappear_at` and `respawn_at = disappear_at + respawn_delay`. However
//! late the next tick runs, comparing against both tells which transitions
//! are already due.

use tracing::info;

use crate::engine::TickContext;
use crate::event::ArenaEvent;
use crate::state::{Entity, Timestamp};
use crate::stats::death_penalty;

pub(crate) fn apply_death(entity: &mut Entity, cx: &mut TickContext<'_, '_>) {
    let config = cx.env.config();

    cx.nav.reset_path(entity.id);
    entity.health = 0;
    entity.buffs.clear();
    entity.target = None;
    if let Some(skill) = entity.current_skill.and_then(|i| entity.skills.get_mut(i)) {
        skill.cast_end = Timestamp::ZERO;
    }
    entity.current_skill = None;
    entity.next_skill = None;
    entity.pending.clear();

    if let Some(player) = entity.player.as_mut() {
        let percent = config.death_penalty_percent;
        player.experience -= death_penalty(player.experience, percent);
        player.gold -= death_penalty(player.gold, percent);
    }

    entity.hidden = false;
    entity.disappear_at = cx.now + config.disappear_after_ms;
    entity.respawn_at = entity.disappear_at + config.respawn_delay_ms;
    entity.clamp_vitals(cx.env.items());

    info!(entity = %entity.id, respawn_at = %entity.respawn_at, "died");
    cx.emit(ArenaEvent::Died { entity: entity.id });
}
