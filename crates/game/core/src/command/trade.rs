//! Looting dead monsters and trading with merchants.
//!
//! Both sides of every exchange are checked before either side changes.

use super::CommandRejection;
use crate::env::GameEnv;
use crate::state::{ActorId, ActorKind, ActorRecord, BehaviorState, WorldState};

/// Resolves the subject's target and checks the interaction range.
fn interaction_target(
    world: &WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    missing: CommandRejection,
) -> Result<(ActorId, f32), CommandRejection> {
    let actor = world
        .actor(id)
        .ok_or(CommandRejection::SubjectNotFound(id))?;
    if actor.player().is_none() {
        return Err(CommandRejection::NotAPlayer);
    }
    let target_id = actor.target.ok_or_else(|| missing.clone())?;
    let target = world.actor(target_id).ok_or(missing)?;
    let range = env.rules()?.interaction_range;
    Ok((target_id, actor.position.distance(target.position) - range))
}

fn loot_target<'w>(
    world: &'w mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
) -> Result<(&'w mut ActorRecord, &'w mut ActorRecord), CommandRejection> {
    let (target, excess) = interaction_target(world, env, id, CommandRejection::NoLootTarget)?;
    let corpse = world.actor(target).ok_or(CommandRejection::NoLootTarget)?;
    if corpse.monster().is_none() || corpse.state != BehaviorState::Dead {
        return Err(CommandRejection::NoLootTarget);
    }
    if excess > 0.0 {
        return Err(CommandRejection::OutOfInteractionRange);
    }
    world
        .pair_mut(id, target)
        .ok_or(CommandRejection::NoLootTarget)
}

pub(super) fn take_loot_gold(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
) -> Result<(), CommandRejection> {
    let (player, corpse) = loot_target(world, env, id)?;
    let Some(loot) = corpse.monster_mut() else {
        return Err(CommandRejection::NoLootTarget);
    };
    if loot.loot_gold == 0 {
        return Err(CommandRejection::NothingToLoot);
    }
    player.gold = player.gold.saturating_add(loot.loot_gold);
    loot.loot_gold = 0;
    Ok(())
}

pub(super) fn take_loot_item(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
) -> Result<(), CommandRejection> {
    let (player, corpse) = loot_target(world, env, id)?;
    let Some(loot) = corpse.monster_mut() else {
        return Err(CommandRejection::NoLootTarget);
    };
    let len = loot.loot_items.len();
    let slot = loot
        .loot_items
        .get_mut(index)
        .ok_or(CommandRejection::IndexOutOfBounds { index, len })?;
    let Some(stack) = slot.as_ref() else {
        return Err(CommandRejection::NothingToLoot);
    };
    let max_stack = env.item(&stack.item)?.max_stack;
    let bag = &mut player
        .player_mut()
        .ok_or(CommandRejection::NotAPlayer)?
        .inventory;
    if !bag.add(&stack.item, stack.amount, max_stack) {
        return Err(CommandRejection::InventoryFull);
    }
    *slot = None;
    Ok(())
}

/// The shop list of the targeted merchant, after alive and range checks.
fn merchant_shop(
    world: &WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
) -> Result<Vec<String>, CommandRejection> {
    let (target, excess) =
        interaction_target(world, env, id, CommandRejection::NoMerchantTarget)?;
    let merchant = world
        .actor(target)
        .ok_or(CommandRejection::NoMerchantTarget)?;
    let ActorKind::Npc(npc) = &merchant.kind else {
        return Err(CommandRejection::NoMerchantTarget);
    };
    if merchant.state == BehaviorState::Dead {
        return Err(CommandRejection::NoMerchantTarget);
    }
    if excess > 0.0 {
        return Err(CommandRejection::OutOfInteractionRange);
    }
    Ok(npc.shop.clone())
}

pub(super) fn buy(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
    amount: u16,
) -> Result<(), CommandRejection> {
    if amount == 0 {
        return Err(CommandRejection::InvalidAmount(amount));
    }
    let shop = merchant_shop(world, env, id)?;
    let name = shop.get(index).ok_or(CommandRejection::IndexOutOfBounds {
        index,
        len: shop.len(),
    })?;
    let def = env.item(name)?;
    let price = def.buy_price.saturating_mul(u64::from(amount));

    let actor = world
        .actor_mut(id)
        .ok_or(CommandRejection::SubjectNotFound(id))?;
    if actor.gold < price {
        return Err(CommandRejection::NotEnoughGold {
            required: price,
            available: actor.gold,
        });
    }
    let player = actor.player_mut().ok_or(CommandRejection::NotAPlayer)?;
    if !player.inventory.add(name, amount, def.max_stack) {
        return Err(CommandRejection::InventoryFull);
    }
    actor.gold -= price;
    Ok(())
}

pub(super) fn sell(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
    amount: u16,
) -> Result<(), CommandRejection> {
    if amount == 0 {
        return Err(CommandRejection::InvalidAmount(amount));
    }
    merchant_shop(world, env, id)?;

    let actor = world
        .actor_mut(id)
        .ok_or(CommandRejection::SubjectNotFound(id))?;
    let player = actor.player_mut().ok_or(CommandRejection::NotAPlayer)?;
    let len = player.inventory.len();
    if !player.inventory.contains_index(index) {
        return Err(CommandRejection::IndexOutOfBounds { index, len });
    }
    let stack = player
        .inventory
        .get(index)
        .ok_or(CommandRejection::SlotEmpty(index))?;
    if stack.amount < amount {
        return Err(CommandRejection::InvalidAmount(amount));
    }
    let def = env.item(&stack.item)?;
    if !def.sellable {
        return Err(CommandRejection::NotSellable(def.name.clone()));
    }
    player.inventory.take_from(index, amount);
    actor.gold = actor
        .gold
        .saturating_add(def.sell_price.saturating_mul(u64::from(amount)));
    Ok(())
}
