//! Derived actor statistics.
//!
//! Only current health and mana are state. Everything here is recomputed from
//! the actor record and the content oracles whenever it is needed.

mod bonus;
mod resources;

pub use bonus::{Bonuses, collect as collect_bonuses};
pub use resources::{DerivedStats, clamp_resources, fill_resources};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::{ItemStack, WorldTime};

    #[test]
    fn maxima_include_level_equipment_attributes_and_buffs() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        let now = world.time();
        let actor = world.actor_mut(id).unwrap();

        let base = DerivedStats::compute(actor, &env, now);
        assert_eq!(base.health_max, 100);

        let player = actor.player_mut().unwrap();
        *player.equipment.slot_mut(2).unwrap() = Some(ItemStack::new("Leather Vest", 1));
        player.strength = 2;
        actor.buffs.apply("Fortify", 1, now + 10_000);

        let boosted = DerivedStats::compute(actor, &env, now);
        // vest +20, strength 2 * 10, fortify +30
        assert_eq!(boosted.health_max, 170);
        assert_eq!(boosted.defense, base.defense + 3);

        let later = DerivedStats::compute(actor, &env, WorldTime(now.as_millis() + 10_000));
        assert_eq!(later.health_max, 140);
    }

    #[test]
    fn clamping_follows_lost_bonuses() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut world = fixtures::world();
        let id = fixtures::spawn_player(&mut world, &env, "alice");
        let now = world.time();
        let actor = world.actor_mut(id).unwrap();

        actor.buffs.apply("Fortify", 1, now + 1_000);
        fill_resources(actor, &env, now);
        assert_eq!(actor.health, 130);

        let later = now + 1_000;
        clamp_resources(actor, &env, later);
        assert_eq!(actor.health, 100);
    }
}
