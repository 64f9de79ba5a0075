//! Client command validation.
//!
//! Movement and cancel only latch flags for the state machine. Target and
//! skill selections are recorded directly (deferred while casting).
//! Inventory and skill-point commands are validated in full and applied
//! atomically.

use tracing::debug;

use super::CommandError;
use crate::env::GameEnv;
use crate::state::{ArenaState, ClientCommand, EntityId, EntityState};

pub(crate) fn apply_command(
    state: &mut ArenaState,
    env: GameEnv<'_>,
    id: EntityId,
    command: ClientCommand,
) -> Result<(), CommandError> {
    if let ClientCommand::SetTarget(target) = command {
        let visible = state.entity(target).is_some_and(|entity| !entity.hidden);
        if !visible {
            return Err(CommandError::UnknownTarget(target));
        }
    }

    let entity = state
        .entity_mut(id)
        .ok_or(CommandError::UnknownEntity(id))?;
    if entity.is_dead() || entity.has_died() {
        return Err(CommandError::EntityDead(id));
    }

    match command {
        ClientCommand::NavigateTo {
            destination,
            stopping_distance,
        } => entity.pending.request_navigate(destination, stopping_distance),
        ClientCommand::Cancel => entity.pending.raise_cancel(),
        ClientCommand::SetTarget(target) => {
            if entity.state == EntityState::Casting {
                entity.next_target = Some(target);
            } else {
                entity.target = Some(target);
            }
        }
        ClientCommand::UseSkill(index) => {
            if entity.skills.learned(index).is_none() {
                return Err(CommandError::SkillNotLearned(index));
            }
            if entity.state == EntityState::Casting {
                if entity.current_skill != Some(index) {
                    entity.next_skill = Some(index);
                }
            } else {
                entity.current_skill = Some(index);
            }
        }
        ClientCommand::SwapItems { from, to } => {
            let player = entity.player.as_mut().ok_or(CommandError::NotAPlayer(id))?;
            player.inventory.swap(from, to)?;
        }
        ClientCommand::SplitStack { from, to } => {
            let player = entity.player.as_mut().ok_or(CommandError::NotAPlayer(id))?;
            player.inventory.split(from, to)?;
        }
        ClientCommand::MergeStacks { from, to } => {
            let player = entity.player.as_mut().ok_or(CommandError::NotAPlayer(id))?;
            player.inventory.merge(from, to, env.items())?;
        }
        ClientCommand::UseItem(slot) => {
            let player = entity.player.as_ref().ok_or(CommandError::NotAPlayer(id))?;
            let stack = player
                .inventory
                .slot(slot)
                .ok_or(CommandError::NotUsable(slot))?;
            let template = env
                .items()
                .item(&stack.template)
                .filter(|template| template.category.is_consumable())
                .ok_or(CommandError::NotUsable(slot))?;

            let (health, mana) =
                entity.heal(template.restores_health, template.restores_mana, env.items());
            if template.consume_on_use {
                if let Some(player) = entity.player.as_mut() {
                    player.inventory.take_one(slot)?;
                }
                entity.clamp_vitals(env.items());
            }
            debug!(entity = %id, item = %template.name, health, mana, "item used");
        }
        ClientCommand::LearnSkill(index) => {
            entity.skills.learn(index, entity.level, env.skills())?;
        }
        ClientCommand::UpgradeSkill(index) => {
            entity.skills.upgrade(index, entity.level, env.skills())?;
        }
    }
    Ok(())
}
