//! Inventory, trash, equipment and consumable commands.

use super::CommandRejection;
use crate::env::{GameEnv, ItemUsage};
use crate::state::{ActorId, ActorRecord, Equipment, PlayerData, WorldState};
use crate::stats::{DerivedStats, clamp_resources};

fn actor_mut(world: &mut WorldState, id: ActorId) -> Result<&mut ActorRecord, CommandRejection> {
    world
        .actor_mut(id)
        .ok_or(CommandRejection::SubjectNotFound(id))
}

fn player_mut(world: &mut WorldState, id: ActorId) -> Result<&mut PlayerData, CommandRejection> {
    actor_mut(world, id)?
        .player_mut()
        .ok_or(CommandRejection::NotAPlayer)
}

fn check_index(player: &PlayerData, index: usize) -> Result<(), CommandRejection> {
    if player.inventory.contains_index(index) {
        Ok(())
    } else {
        Err(CommandRejection::IndexOutOfBounds {
            index,
            len: player.inventory.len(),
        })
    }
}

pub(super) fn swap(
    world: &mut WorldState,
    id: ActorId,
    a: usize,
    b: usize,
) -> Result<(), CommandRejection> {
    let player = player_mut(world, id)?;
    check_index(player, a)?;
    check_index(player, b)?;
    if a == b {
        return Err(CommandRejection::NoEffect);
    }
    player.inventory.swap(a, b);
    Ok(())
}

pub(super) fn split(
    world: &mut WorldState,
    id: ActorId,
    from: usize,
    to: usize,
) -> Result<(), CommandRejection> {
    let player = player_mut(world, id)?;
    check_index(player, from)?;
    check_index(player, to)?;
    if player.inventory.get(from).is_none() {
        return Err(CommandRejection::SlotEmpty(from));
    }
    if player.inventory.split(from, to) {
        Ok(())
    } else {
        Err(CommandRejection::NoEffect)
    }
}

pub(super) fn merge(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    from: usize,
    to: usize,
) -> Result<(), CommandRejection> {
    let player = player_mut(world, id)?;
    check_index(player, from)?;
    check_index(player, to)?;
    let stack = player
        .inventory
        .get(from)
        .ok_or(CommandRejection::SlotEmpty(from))?;
    let max_stack = env.item(&stack.item)?.max_stack;
    if player.inventory.merge(from, to, max_stack) {
        Ok(())
    } else {
        Err(CommandRejection::NoEffect)
    }
}

/// Swaps an inventory slot with the trash slot. Whatever lands in the trash
/// must be destroyable.
pub(super) fn to_trash(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
) -> Result<(), CommandRejection> {
    let player = player_mut(world, id)?;
    check_index(player, index)?;
    let Some(stack) = player.inventory.get(index) else {
        return Err(CommandRejection::SlotEmpty(index));
    };
    if !env.item(&stack.item)?.destroyable {
        return Err(CommandRejection::NotDestroyable(stack.item.clone()));
    }
    swap_with_trash(player, index);
    Ok(())
}

pub(super) fn from_trash(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
) -> Result<(), CommandRejection> {
    let player = player_mut(world, id)?;
    check_index(player, index)?;
    if player.trash.is_none() {
        return Err(CommandRejection::NoEffect);
    }
    if let Some(stack) = player.inventory.get(index)
        && !env.item(&stack.item)?.destroyable
    {
        return Err(CommandRejection::NotDestroyable(stack.item.clone()));
    }
    swap_with_trash(player, index);
    Ok(())
}

fn swap_with_trash(player: &mut PlayerData, index: usize) {
    if let Some(slot) = player.inventory.slot_mut(index) {
        std::mem::swap(slot, &mut player.trash);
    }
}

/// Swaps an inventory slot with an equipment slot. The item entering the
/// equipment slot must fit its category and the actor's level.
pub(super) fn equip(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    inventory: usize,
    equipment: usize,
) -> Result<(), CommandRejection> {
    let now = world.time();
    let actor = actor_mut(world, id)?;
    let level = actor.level;
    let player = actor.player_mut().ok_or(CommandRejection::NotAPlayer)?;
    check_index(player, inventory)?;
    let expected = Equipment::category(equipment).ok_or(CommandRejection::IndexOutOfBounds {
        index: equipment,
        len: player.equipment.len(),
    })?;

    match player.inventory.get(inventory) {
        Some(stack) => {
            let def = env.item(&stack.item)?;
            if def.category != expected {
                return Err(CommandRejection::CategoryMismatch {
                    expected,
                    found: def.category,
                });
            }
            if level < def.min_level {
                return Err(CommandRejection::LevelTooLow {
                    required: def.min_level,
                });
            }
        }
        None if player.equipment.get(equipment).is_none() => {
            return Err(CommandRejection::SlotEmpty(inventory));
        }
        None => {}
    }

    let PlayerData {
        inventory: bag,
        equipment: worn,
        ..
    } = player;
    if let (Some(a), Some(b)) = (bag.slot_mut(inventory), worn.slot_mut(equipment)) {
        std::mem::swap(a, b);
    }
    // Unequipping can lower the maxima below current values.
    clamp_resources(actor, env, now);
    Ok(())
}

/// Consumes one unit of a usable item.
pub(super) fn use_item(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
) -> Result<(), CommandRejection> {
    let now = world.time();
    let actor = actor_mut(world, id)?;
    let player = actor.player().ok_or(CommandRejection::NotAPlayer)?;
    check_index(player, index)?;
    let stack = player
        .inventory
        .get(index)
        .ok_or(CommandRejection::SlotEmpty(index))?;
    let def = env.item(&stack.item)?;
    let usage = def
        .usage
        .as_ref()
        .ok_or_else(|| CommandRejection::NotUsable(def.name.clone()))?;

    match usage {
        ItemUsage::Restore { health, mana } => {
            let maxima = DerivedStats::compute(actor, env, now);
            actor.health = actor.health.saturating_add(*health).min(maxima.health_max);
            actor.mana = actor.mana.saturating_add(*mana).min(maxima.mana_max);
        }
        ItemUsage::GrantBuff { buff, level } => {
            let duration = u64::from(env.buff(buff)?.duration_ms.at(*level));
            actor.buffs.apply(buff, *level, now + duration);
        }
    }

    if let Some(player) = actor.player_mut() {
        player.inventory.take_from(index, 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::command::{Command, CommandRejection, Request, try_handle};
    use crate::fixtures;
    use crate::state::{BehaviorState, ItemStack};

    fn give(world: &mut crate::state::WorldState, id: crate::state::ActorId, slot: usize, stack: ItemStack) {
        let player = world.actor_mut(id).unwrap().player_mut().unwrap();
        *player.inventory.slot_mut(slot).unwrap() = Some(stack);
    }

    #[test]
    fn swap_is_rejected_while_dead_and_leaves_slots_untouched() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        give(&mut world, id, 1, ItemStack::new("Arrow", 10));
        world.actor_mut(id).unwrap().state = BehaviorState::Dead;

        let err = try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::SwapInventorySlots { a: 0, b: 1 }),
        )
        .unwrap_err();

        assert!(matches!(err, CommandRejection::StateNotAllowed { .. }));
        let inventory = &world.actor(id).unwrap().player().unwrap().inventory;
        assert_eq!(inventory.get(0), Some(&ItemStack::new("Health Potion", 3)));
        assert_eq!(inventory.get(1), Some(&ItemStack::new("Arrow", 10)));
    }

    #[test]
    fn split_keeps_the_larger_half_in_the_source() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        give(&mut world, id, 2, ItemStack::new("Arrow", 7));

        try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::SplitInventorySlot { from: 2, to: 3 }),
        )
        .unwrap();

        let inventory = &world.actor(id).unwrap().player().unwrap().inventory;
        assert_eq!(inventory.get(2).unwrap().amount, 4);
        assert_eq!(inventory.get(3).unwrap().amount, 3);
    }

    #[test]
    fn equip_checks_category_and_clamps_on_removal() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        give(&mut world, id, 1, ItemStack::new("Leather Vest", 1));

        // Slot 0 is the weapon slot.
        let err = try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::Equip { inventory: 1, equipment: 0 }),
        )
        .unwrap_err();
        assert!(matches!(err, CommandRejection::CategoryMismatch { .. }));

        try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::Equip { inventory: 1, equipment: 2 }),
        )
        .unwrap();
        world.actor_mut(id).unwrap().health = 120;

        // Unequip into the now-empty inventory slot.
        try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::Equip { inventory: 1, equipment: 2 }),
        )
        .unwrap();
        let actor = world.actor(id).unwrap();
        assert_eq!(actor.health, 100);
        assert_eq!(
            actor.player().unwrap().inventory.get(1),
            Some(&ItemStack::new("Leather Vest", 1))
        );
    }

    #[test]
    fn undestroyable_items_stay_out_of_the_trash() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        give(&mut world, id, 1, ItemStack::new("Quest Token", 1));

        let err = try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::MoveInventoryToTrash { index: 1 }),
        )
        .unwrap_err();
        assert!(matches!(err, CommandRejection::NotDestroyable(_)));

        try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::MoveInventoryToTrash { index: 0 }),
        )
        .unwrap();
        let player = world.actor(id).unwrap().player().unwrap();
        assert_eq!(player.trash, Some(ItemStack::new("Health Potion", 3)));
        assert_eq!(player.inventory.get(0), None);
    }

    #[test]
    fn potion_restores_up_to_the_maximum_and_is_consumed() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        world.actor_mut(id).unwrap().health = 70;

        try_handle(
            &mut world,
            &env,
            &Request::own(id, Command::UseInventoryItem { index: 0 }),
        )
        .unwrap();

        let actor = world.actor(id).unwrap();
        assert_eq!(actor.health, 100);
        assert_eq!(actor.player().unwrap().inventory.get(0).unwrap().amount, 2);
    }

    #[test]
    fn upgrading_spends_a_point_and_stops_at_max_level() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        world.actor_mut(id).unwrap().player_mut().unwrap().skill_points = 5;
        let upgrade = Request::own(id, Command::UpgradeSkill { index: fixtures::skills::STRIKE });

        try_handle(&mut world, &env, &upgrade).unwrap();
        try_handle(&mut world, &env, &upgrade).unwrap();
        let err = try_handle(&mut world, &env, &upgrade).unwrap_err();

        assert!(matches!(err, CommandRejection::SkillMaxed(_)));
        let actor = world.actor(id).unwrap();
        assert_eq!(actor.skills[fixtures::skills::STRIKE].level, 3);
        assert_eq!(actor.player().unwrap().skill_points, 3);
    }
}
