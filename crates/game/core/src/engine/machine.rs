//! Per-entity state machine.
//!
//! Each tick the handler for the entity's current state walks a fixed,
//! priority-ordered list of events and performs only the first transition
//! that matches. Events that lose out are not lost: status events are
//! recomputed next tick, and command flags stay latched until a handler
//! consumes them.
//!
//! | State   | Priority order                                                   |
//! |---------|------------------------------------------------------------------|
//! | IDLE    | died, cancel, navigate, skill request                            |
//! | MOVING  | died, arrived, cancel, navigate, skill request                   |
//! | CASTING | died, navigate, cancel, target lost (if the skill cares), finished |
//! | DEAD    | respawn due, disappear due                                       |

use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};

use super::TickContext;
use crate::combat::{
    CastError, Reach, apply_death, apply_skill, check_distance, check_self,
    check_target, target_lost,
};
use crate::env::{GameEnv, SkillTemplate};
use crate::event::ArenaEvent;
use crate::state::{Entity, EntityId, EntityState, Position, Timestamp};

/// Runs one authoritative step for `actor`.
///
/// `others` holds every other entity; the actor itself has been taken out of
/// the map for the duration of its step.
pub(crate) fn step(
    actor: &mut Entity,
    others: &mut BTreeMap<EntityId, Entity>,
    cx: &mut TickContext<'_, '_>,
) {
    let items = cx.env.items();

    if let Some(position) = cx.nav.position(actor.id) {
        actor.position = position;
    }
    let expired = actor.buffs.expire(cx.now);
    if expired > 0 {
        debug!(entity = %actor.id, expired, "buffs expired");
    }
    actor.clamp_vitals(items);
    recover(actor, cx);

    let from = actor.state;
    let to = match from {
        EntityState::Idle => update_idle(actor, others, cx),
        EntityState::Moving => update_moving(actor, others, cx),
        EntityState::Casting => update_casting(actor, others, cx),
        EntityState::Dead => update_dead(actor, cx),
    };
    actor.state = to;
    actor.clamp_vitals(items);

    if from != to {
        debug!(entity = %actor.id, %from, %to, "state changed");
        cx.emit(ArenaEvent::StateChanged {
            entity: actor.id,
            from,
            to,
        });
    }
}

fn recover(actor: &mut Entity, cx: &TickContext<'_, '_>) {
    if !actor.is_alive() || cx.now < actor.next_recovery {
        return;
    }
    actor.next_recovery = cx.now + cx.env.config().recovery_interval_ms;
    let (health, mana) = (actor.base.health_recovery, actor.base.mana_recovery);
    if health > 0 || mana > 0 {
        actor.heal(health, mana, cx.env.items());
    }
}

fn update_idle(
    actor: &mut Entity,
    others: &mut BTreeMap<EntityId, Entity>,
    cx: &mut TickContext<'_, '_>,
) -> EntityState {
    if actor.has_died() {
        actor.next_target = None;
        apply_death(actor, cx);
        return EntityState::Dead;
    }
    if actor.pending.take_cancel() {
        actor.target = None;
        actor.current_skill = None;
        actor.next_skill = None;
        return EntityState::Idle;
    }
    if let Some(request) = actor.pending.take_navigate() {
        actor.current_skill = None;
        cx.nav
            .set_destination(actor.id, request.destination, request.stopping_distance);
        return EntityState::Moving;
    }
    if actor.current_skill.is_some() {
        return request_skill(actor, others, cx, EntityState::Idle);
    }
    EntityState::Idle
}

fn update_moving(
    actor: &mut Entity,
    others: &mut BTreeMap<EntityId, Entity>,
    cx: &mut TickContext<'_, '_>,
) -> EntityState {
    if actor.has_died() {
        actor.next_target = None;
        apply_death(actor, cx);
        return EntityState::Dead;
    }
    if cx.nav.has_arrived(actor.id) {
        return EntityState::Idle;
    }
    if actor.pending.take_cancel() {
        cx.nav.reset_path(actor.id);
        actor.current_skill = None;
        actor.next_skill = None;
        return EntityState::Idle;
    }
    if let Some(request) = actor.pending.take_navigate() {
        actor.current_skill = None;
        cx.nav
            .set_destination(actor.id, request.destination, request.stopping_distance);
        return EntityState::Moving;
    }
    if actor.current_skill.is_some() {
        return request_skill(actor, others, cx, EntityState::Moving);
    }
    EntityState::Moving
}

fn update_casting(
    actor: &mut Entity,
    others: &mut BTreeMap<EntityId, Entity>,
    cx: &mut TickContext<'_, '_>,
) -> EntityState {
    if let Some(position) = actor
        .target
        .filter(|id| *id != actor.id)
        .and_then(|id| others.get(&id))
        .map(|target| target.position)
    {
        actor.face(&position);
    }

    if actor.has_died() {
        abort_cast(actor, cx);
        apply_death(actor, cx);
        actor.flush_next_target();
        return EntityState::Dead;
    }
    if let Some(request) = actor.pending.take_navigate() {
        abort_cast(actor, cx);
        actor.flush_next_target();
        cx.nav
            .set_destination(actor.id, request.destination, request.stopping_distance);
        return EntityState::Moving;
    }
    if actor.pending.take_cancel() {
        abort_cast(actor, cx);
        actor.flush_next_target();
        return EntityState::Idle;
    }

    let Some(index) = actor.current_skill else {
        error!(entity = %actor.id, "casting without a current skill, forcing idle");
        abort_cast(actor, cx);
        actor.flush_next_target();
        return EntityState::Idle;
    };
    let Some(template) = skill_template(actor, index, cx.env) else {
        error!(entity = %actor.id, index, "casting a skill without a template, forcing idle");
        abort_cast(actor, cx);
        actor.flush_next_target();
        return EntityState::Idle;
    };

    if template.cancel_cast_if_target_died && target_lost(actor, others) {
        debug!(entity = %actor.id, skill = %template.name, "target lost, cast cancelled");
        abort_cast(actor, cx);
        actor.flush_next_target();
        return EntityState::Idle;
    }

    let remaining = actor
        .skills
        .get(index)
        .map_or(0, |skill| skill.cast_time_remaining(cx.now));
    if remaining > 0 {
        return EntityState::Casting;
    }

    finish_cast(actor, others, index, template, cx);
    actor.current_skill = match actor.next_skill.take() {
        Some(next) => Some(next),
        None if template.followup_default_attack => Some(0),
        None => None,
    };
    actor.flush_next_target();
    EntityState::Idle
}

/// A late tick may cross both timers, in which case the entity disappears
/// and respawns within the same step.
fn update_dead(actor: &mut Entity, cx: &mut TickContext<'_, '_>) -> EntityState {
    if cx.now >= actor.disappear_at && !actor.hidden {
        actor.hidden = true;
        debug!(entity = %actor.id, "disappeared");
        cx.emit(ArenaEvent::Disappeared { entity: actor.id });
        if !actor.respawns {
            cx.despawn.push(actor.id);
        }
    }
    if actor.respawns && cx.now >= actor.respawn_at {
        respawn(actor, cx);
        return EntityState::Idle;
    }
    EntityState::Dead
}

/// Self, target, and distance checks for the pending skill request.
///
/// A skill that is only waiting on its cooldown stays requested. Any other
/// failure drops the request and keeps the current state.
fn request_skill(
    actor: &mut Entity,
    others: &mut BTreeMap<EntityId, Entity>,
    cx: &mut TickContext<'_, '_>,
    current: EntityState,
) -> EntityState {
    let Some(index) = actor.current_skill else {
        return current;
    };
    let Some(template) = skill_template(actor, index, cx.env) else {
        warn!(entity = %actor.id, index, "requested skill has no template");
        actor.current_skill = None;
        return current;
    };

    match check_self(actor, index, template, cx.now, false) {
        Ok(()) => {}
        Err(CastError::OnCooldown { .. }) => return current,
        Err(err) => {
            debug!(entity = %actor.id, skill = %template.name, %err, "skill request dropped");
            actor.current_skill = None;
            return current;
        }
    }

    let original = actor.target;
    let target = match check_target(actor, others, template) {
        Ok(target) => target,
        Err(err) => {
            debug!(entity = %actor.id, skill = %template.name, %err, "skill request dropped");
            actor.current_skill = None;
            return current;
        }
    };
    let resolved = target.id(actor.id);
    if original != Some(resolved) {
        actor.target = Some(resolved);
        if actor.next_target.is_none() {
            actor.next_target = original;
        }
    }

    let Some(target_position) = target.position(actor, others) else {
        actor.current_skill = None;
        return current;
    };
    let level = actor.skills.get(index).map_or(1, |skill| skill.level);
    let range = template.cast_range_at(level);
    match check_distance(
        actor.position,
        target_position,
        range,
        cx.env.config().approach_ratio(),
    ) {
        Reach::InRange => {
            cx.nav.reset_path(actor.id);
            start_cast(actor, index, template, target_position, cx);
            EntityState::Casting
        }
        Reach::MoveTo(destination) => {
            cx.nav.set_destination(actor.id, destination, 0.0);
            EntityState::Moving
        }
    }
}

fn start_cast(
    actor: &mut Entity,
    index: usize,
    template: &SkillTemplate,
    target_position: Position,
    cx: &mut TickContext<'_, '_>,
) {
    let Some(skill) = actor.skills.get_mut(index) else {
        return;
    };
    let ends_at = cx.now + template.cast_time_at(skill.level);
    skill.cast_end = ends_at;
    actor.face(&target_position);
    cx.emit(ArenaEvent::CastStarted {
        entity: actor.id,
        skill: index,
        target: actor.target,
        ends_at,
    });
}

/// Re-validates and commits the cast: mana, cooldown, then the effect.
///
/// The cooldown is ignored here since it was checked when the cast started.
fn finish_cast(
    actor: &mut Entity,
    others: &mut BTreeMap<EntityId, Entity>,
    index: usize,
    template: &SkillTemplate,
    cx: &mut TickContext<'_, '_>,
) {
    if let Some(skill) = actor.skills.get_mut(index) {
        skill.cast_end = Timestamp::ZERO;
    }
    if let Err(err) = check_self(actor, index, template, cx.now, true) {
        debug!(entity = %actor.id, skill = %template.name, %err, "cast fizzled");
        return;
    }
    let target = match check_target(actor, others, template) {
        Ok(target) => target,
        Err(err) => {
            debug!(entity = %actor.id, skill = %template.name, %err, "cast fizzled");
            return;
        }
    };

    let now = cx.now;
    if let Some(skill) = actor.skills.get_mut(index) {
        actor.mana = actor.mana.saturating_sub(template.mana_cost_at(skill.level));
        skill.cooldown_end = now + template.cooldown_at(skill.level);
    }
    cx.emit(ArenaEvent::CastFinished {
        entity: actor.id,
        skill: index,
        target: target.id(actor.id),
    });
    apply_skill(actor, target, others, index, template, cx);
}

/// Clears the running cast and any queued follow-up. Aborted casts cost nothing.
fn abort_cast(actor: &mut Entity, cx: &mut TickContext<'_, '_>) {
    actor.next_skill = None;
    let Some(index) = actor.current_skill.take() else {
        return;
    };
    if let Some(skill) = actor.skills.get_mut(index) {
        skill.cast_end = Timestamp::ZERO;
    }
    cx.emit(ArenaEvent::CastAborted {
        entity: actor.id,
        skill: index,
    });
}

fn respawn(actor: &mut Entity, cx: &mut TickContext<'_, '_>) {
    let position = cx.env.spawns().spawn_point(actor.team).unwrap_or_else(|| {
        warn!(entity = %actor.id, team = %actor.team, "no spawn point, respawning in place");
        actor.position
    });
    cx.nav.warp(actor.id, position);
    actor.position = position;
    actor.hidden = false;
    actor.disappear_at = Timestamp::ZERO;
    actor.respawn_at = Timestamp::ZERO;
    actor.skills.reset_timers();
    actor.buffs.clear();
    actor.pending.clear();
    actor.restore_vitals(cx.env.items());
    actor.next_recovery = cx.now + cx.env.config().recovery_interval_ms;

    info!(entity = %actor.id, x = position.x, z = position.z, "respawned");
    cx.emit(ArenaEvent::Respawned {
        entity: actor.id,
        position,
    });
}

fn skill_template<'a>(actor: &Entity, index: usize, env: GameEnv<'a>) -> Option<&'a SkillTemplate> {
    let skill = actor.skills.get(index)?;
    env.skills().skill(&skill.template)
}

