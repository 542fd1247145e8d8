//! Offender/murderer status as a side effect of the damage pipeline.
//!
//! Status is stored as ordinary buffs (see [`crate::env::WorldRules`] for the
//! names and durations), so expiry and refresh follow the buff lifecycle.
//!
//! Policy, evaluated per damage event between two player sides:
//! - hitting an innocent grants the attacker Offender
//! - killing an innocent grants Murderer, which replaces Offender
//! - a murderer is not additionally flagged as offender
//! - hitting or killing a flagged player changes nothing

use tracing::debug;

use crate::engine::{DamageEvent, WorldHook};
use crate::env::{GameEnv, WorldRules};
use crate::state::{ActorId, WorldState, WorldTime};

/// The player responsible for `id`: itself, or the owner of a pet or mount.
/// `None` for monsters and NPCs.
pub fn responsible_player(world: &WorldState, id: ActorId) -> Option<ActorId> {
    let actor = world.actor(id)?;
    if actor.kind.is_player() {
        return Some(id);
    }
    let owner = actor.kind.owner()?;
    world
        .actor(owner)
        .filter(|owner| owner.kind.is_player())
        .map(|owner| owner.id)
}

/// Whether the player side of `id` carries neither PvP status buff.
///
/// Monsters and NPCs are never innocent: hitting them has no PvP consequence.
pub fn is_innocent(world: &WorldState, rules: &WorldRules, id: ActorId, now: WorldTime) -> bool {
    let Some(player) = responsible_player(world, id).and_then(|id| world.actor(id)) else {
        return false;
    };
    !player.buffs.has_active(&rules.offender_buff, now)
        && !player.buffs.has_active(&rules.murderer_buff, now)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PvpStatusHook;

impl WorldHook for PvpStatusHook {
    fn name(&self) -> &'static str {
        "pvp-status"
    }

    fn on_damage_dealt(&self, world: &mut WorldState, env: &GameEnv<'_>, event: &DamageEvent) {
        if !event.victim_innocent {
            return;
        }
        let Ok(rules) = env.rules() else {
            return;
        };
        let (Some(attacker), Some(victim)) = (
            responsible_player(world, event.attacker),
            responsible_player(world, event.victim),
        ) else {
            return;
        };
        if attacker == victim {
            return;
        }

        let now = world.time();
        let Some(actor) = world.actor_mut(attacker) else {
            return;
        };
        if event.killed {
            actor.buffs.remove(&rules.offender_buff);
            actor
                .buffs
                .apply(&rules.murderer_buff, 1, now + rules.murderer_duration_ms);
            debug!(target: "realm::pvp", actor = %attacker, victim = %victim, "murderer status granted");
        } else if !actor.buffs.has_active(&rules.murderer_buff, now) {
            actor
                .buffs
                .apply(&rules.offender_buff, 1, now + rules.offender_duration_ms);
            debug!(target: "realm::pvp", actor = %attacker, victim = %victim, "offender status granted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::Position;

    fn hit(world: &mut WorldState, env: &GameEnv<'_>, attacker: ActorId, victim: ActorId, killed: bool) {
        let rules = env.rules().unwrap();
        let event = DamageEvent {
            attacker,
            victim,
            amount: 10,
            killed,
            victim_innocent: is_innocent(world, rules, victim, world.time()),
        };
        PvpStatusHook.on_damage_dealt(world, env, &event);
    }

    #[test]
    fn attacking_an_innocent_makes_an_offender() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let bob = fixtures::spawn_player(&mut world, &env, "bob");

        hit(&mut world, &env, alice, bob, false);

        let now = world.time();
        assert!(world.actor(alice).unwrap().buffs.has_active("Offender", now));
        assert!(world.actor(bob).unwrap().buffs.is_empty());
    }

    #[test]
    fn killing_an_innocent_replaces_offender_with_murderer() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let bob = fixtures::spawn_player(&mut world, &env, "bob");

        hit(&mut world, &env, alice, bob, false);
        hit(&mut world, &env, alice, bob, true);

        let buffs = &world.actor(alice).unwrap().buffs;
        assert!(buffs.has_active("Murderer", world.time()));
        assert!(!buffs.has_active("Offender", world.time()));
    }

    #[test]
    fn retaliation_against_an_offender_is_free() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let bob = fixtures::spawn_player(&mut world, &env, "bob");

        hit(&mut world, &env, alice, bob, false);
        hit(&mut world, &env, bob, alice, true);

        assert!(world.actor(bob).unwrap().buffs.is_empty());
    }

    #[test]
    fn pet_damage_is_attributed_to_its_owner() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let bob = fixtures::spawn_player(&mut world, &env, "bob");
        let wolf = fixtures::spawn_pet(&mut world, &env, alice, Position::ORIGIN);

        hit(&mut world, &env, wolf, bob, false);

        assert!(world.actor(alice).unwrap().buffs.has_active("Offender", world.time()));
    }

    #[test]
    fn monsters_never_trigger_status() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let goblin = fixtures::spawn_monster(&mut world, &env, Position::ORIGIN);

        hit(&mut world, &env, alice, goblin, true);
        hit(&mut world, &env, goblin, alice, false);

        assert!(world.actor(alice).unwrap().buffs.is_empty());
    }
}
