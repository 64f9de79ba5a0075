//! Skill effect application and kill rewards.
//!
//! These are the only paths through which one entity changes another:
//! damage, healing, buffs, and the reward granted to a killer.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::checks::CastTarget;
use super::damage::calculate_damage;
use crate::engine::TickContext;
use crate::env::{RollKind, SkillEffect, SkillTemplate};
use crate::event::ArenaEvent;
use crate::state::{Buff, Entity, EntityId};
use crate::stats::{StatBonus, gain_experience};

/// Applies `template` at the caster's skill level to the resolved target.
pub(crate) fn apply_skill(
    caster: &mut Entity,
    target: CastTarget,
    others: &mut BTreeMap<EntityId, Entity>,
    index: usize,
    template: &SkillTemplate,
    cx: &mut TickContext<'_, '_>,
) {
    let level = caster.skills.get(index).map_or(1, |skill| skill.level.max(1));

    match &template.effect {
        SkillEffect::Damage { amount } => {
            let CastTarget::Other(id) = target else {
                warn!(caster = %caster.id, skill = %template.name, "damage skill resolved to its caster");
                return;
            };
            if let Some(victim) = others.get_mut(&id) {
                deal_damage(caster, victim, amount.get_u32(level), cx);
            }
        }
        SkillEffect::Heal { health, mana } => {
            let source = caster.id;
            if let Some(recipient) = recipient(caster, target, others) {
                heal(source, recipient, health.get_u32(level), mana.get_u32(level), cx);
            }
        }
        SkillEffect::Buff { bonus, duration_ms }
        | SkillEffect::SelfBuff { bonus, duration_ms }
        | SkillEffect::Debuff { bonus, duration_ms } => {
            let source = caster.id;
            let duration = duration_ms.get_millis(level);
            if let Some(recipient) = recipient(caster, target, others) {
                buff(source, recipient, &template.name, *bonus, duration, cx);
            }
        }
    }
}

fn recipient<'e>(
    caster: &'e mut Entity,
    target: CastTarget,
    others: &'e mut BTreeMap<EntityId, Entity>,
) -> Option<&'e mut Entity> {
    match target {
        CastTarget::Caster => Some(caster),
        CastTarget::Other(id) => others.get_mut(&id),
    }
}

/// Resolves one hit. A hit that drops the victim to zero health is the
/// killing blow and pays the attacker its reward immediately.
pub(crate) fn deal_damage(
    attacker: &mut Entity,
    victim: &mut Entity,
    amount: u32,
    cx: &mut TickContext<'_, '_>,
) {
    let items = cx.env.items();
    let attack = attacker.stats(items);
    let defense = victim.stats(items);

    let blocked = cx.roll(attacker.id, victim.id, RollKind::Block, defense.block_chance);
    let critical =
        !blocked && cx.roll(attacker.id, victim.id, RollKind::Critical, attack.critical_chance);
    let raw = attack.damage.saturating_add(amount);
    let (dealt, kind) = calculate_damage(raw, defense.defense, blocked, critical);

    let was_alive = victim.health > 0;
    victim.health = victim.health.saturating_sub(dealt);
    debug!(
        attacker = %attacker.id,
        victim = %victim.id,
        dealt,
        kind = %kind,
        health = victim.health,
        "hit"
    );
    cx.emit(ArenaEvent::Damaged {
        attacker: attacker.id,
        target: victim.id,
        amount: dealt,
        kind,
    });

    if was_alive && victim.health == 0 {
        grant_reward(attacker, victim, cx);
    }
}

/// Experience and gold for a kill, balanced by level. Only players collect.
pub(crate) fn grant_reward(killer: &mut Entity, victim: &Entity, cx: &mut TickContext<'_, '_>) {
    let config = cx.env.config();
    let base = if victim.is_player() {
        config.player_kill_reward
    } else {
        victim.kill_reward
    };
    let reward = base.balanced(killer.level, victim.level);

    let Some(player) = killer.player.as_mut() else {
        return;
    };
    player.gold = player.gold.saturating_add(reward.gold);
    let levels = gain_experience(
        &mut killer.level,
        &mut player.experience,
        reward.experience,
        &config.experience_curve,
        config.max_level,
    );

    cx.emit(ArenaEvent::Rewarded {
        entity: killer.id,
        victim: victim.id,
        experience: reward.experience,
        gold: reward.gold,
    });
    if levels > 0 {
        info!(entity = %killer.id, level = killer.level, "level up");
        cx.emit(ArenaEvent::LeveledUp {
            entity: killer.id,
            level: killer.level,
        });
    }
}

pub(crate) fn heal(
    source: EntityId,
    recipient: &mut Entity,
    health: u32,
    mana: u32,
    cx: &mut TickContext<'_, '_>,
) {
    let (health, mana) = recipient.heal(health, mana, cx.env.items());
    cx.emit(ArenaEvent::Healed {
        source,
        target: recipient.id,
        health,
        mana,
    });
}

fn buff(
    source: EntityId,
    recipient: &mut Entity,
    name: &str,
    bonus: StatBonus,
    duration_ms: u64,
    cx: &mut TickContext<'_, '_>,
) {
    let expires_at = cx.now + duration_ms;
    if !recipient.buffs.apply(Buff::new(name, bonus, expires_at)) {
        warn!(entity = %recipient.id, buff = name, "buff slots full, dropping buff");
        return;
    }
    recipient.clamp_vitals(cx.env.items());
    cx.emit(ArenaEvent::BuffApplied {
        source,
        target: recipient.id,
        buff: name.to_string(),
        expires_at,
    });
}
