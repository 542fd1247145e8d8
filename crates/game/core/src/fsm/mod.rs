//! Authoritative per-actor behavior state machine.
//!
//! Each tick [`update`] detects the actor's [`Events`] once, dispatches on the
//! current [`BehaviorState`] and stores the state returned by that state's
//! transition rules. The result is always one of the closed set of states;
//! unexpected event combinations never abort, the state simply holds.

mod events;
mod states;

pub use events::{Events, detect};

use tracing::debug;

use crate::engine::{HookRegistry, StateChange};
use crate::env::GameEnv;
use crate::state::{ActorId, BehaviorState, WorldState};

/// Runs one transition for `id`. Returns the new state, or `None` if the
/// actor does not exist.
pub fn update(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
) -> Option<BehaviorState> {
    let from = world.actor(id)?.state;
    let events = detect(world, id);

    let to = match from {
        BehaviorState::Idle => states::idle(world, env, hooks, id, events),
        BehaviorState::Moving => states::moving(world, env, hooks, id, events),
        BehaviorState::Casting => states::casting(world, env, hooks, id, events),
        BehaviorState::Stunned => states::stunned(world, env, hooks, id, events),
        BehaviorState::Dead => states::dead(world, env, id, events),
        BehaviorState::Trading | BehaviorState::Crafting => {
            states::placeholder(world, env, hooks, id, from, events)
        }
    };

    let actor = world.actor_mut(id)?;
    actor.state = to;
    if from != to {
        debug!(target: "realm::fsm", actor = %id, from = %from, to = %to, events = ?events, "state changed");
        hooks.state_changed(world, &StateChange { actor: id, from, to });
    }
    Some(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, skills};
    use crate::state::{BehaviorState::*, Motion, Position};

    struct Harness {
        world: WorldState,
        hooks: HookRegistry,
    }

    impl Harness {
        fn step(&mut self, env: &GameEnv<'_>, id: ActorId) -> BehaviorState {
            update(&mut self.world, env, &self.hooks, id).unwrap()
        }

        fn advance(&mut self, ms: u64) {
            let now = self.world.time();
            self.world.set_time(now + ms);
        }
    }

    fn harness() -> Harness {
        Harness {
            world: fixtures::world(),
            hooks: HookRegistry::with_defaults(),
        }
    }

    #[test]
    fn death_preempts_everything() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.health = 0;
            actor.requests.cancel = true;
            actor.motion = Motion::Destination(Position::new(5.0, 0.0));
            actor.skill_request = Some(skills::FORTIFY);
        }

        assert_eq!(h.step(&env, alice), Dead);
        let actor = h.world.actor(alice).unwrap();
        assert_eq!(actor.motion, Motion::Idle);
        assert_eq!(actor.skill_request, None);
    }

    #[test]
    fn idle_move_start_clears_pending_skill() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.motion = Motion::Destination(Position::new(5.0, 0.0));
            actor.requests.motion = true;
            actor.skill_request = Some(skills::FORTIFY);
        }

        assert_eq!(h.step(&env, alice), Moving);
        assert_eq!(h.world.actor(alice).unwrap().skill_request, None);
    }

    #[test]
    fn idle_cancel_clears_target() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let goblin = fixtures::spawn_monster(&mut h.world, &env, Position::new(1.0, 0.0));
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.target = Some(goblin);
            actor.requests.cancel = true;
        }

        assert_eq!(h.step(&env, alice), Idle);
        assert_eq!(h.world.actor(alice).unwrap().target, None);
        // consumed exactly once
        assert!(!h.world.actor(alice).unwrap().requests.cancel);
    }

    #[test]
    fn failed_request_clears_index_and_stays_idle() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        h.world.actor_mut(alice).unwrap().skill_request = Some(skills::STRIKE);

        assert_eq!(h.step(&env, alice), Idle);
        let actor = h.world.actor(alice).unwrap();
        assert_eq!(actor.skill_request, None);
        assert_eq!(actor.current_skill(), None);
        assert_eq!(actor.mana, 50);
    }

    #[test]
    fn idle_cast_resets_motion_but_moving_cast_keeps_it() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let bob = fixtures::spawn_player(&mut h.world, &env, "bob");
        let destination = Motion::Destination(Position::new(9.0, 9.0));

        for (id, state) in [(alice, Idle), (bob, Moving)] {
            let actor = h.world.actor_mut(id).unwrap();
            actor.state = state;
            actor.skill_request = Some(skills::FORTIFY);
        }
        h.world.actor_mut(bob).unwrap().motion = destination;

        assert_eq!(h.step(&env, alice), Casting);
        assert_eq!(h.step(&env, bob), Casting);
        assert_eq!(h.world.actor(alice).unwrap().motion, Motion::Idle);
        assert_eq!(h.world.actor(bob).unwrap().motion, destination);
    }

    #[test]
    fn casting_from_a_steer_stops_the_slide() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.state = Moving;
            actor.motion = Motion::Velocity(crate::state::Velocity::new(3.0, 0.0));
            actor.skill_request = Some(skills::FORTIFY);
        }

        assert_eq!(h.step(&env, alice), Casting);
        assert_eq!(h.world.actor(alice).unwrap().motion, Motion::Idle);
    }

    #[test]
    fn a_dead_mount_throws_its_rider() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let horse = crate::spawn::spawn(&mut h.world, &env, "Horse", Position::ORIGIN, Some(alice)).unwrap();
        h.world.actor_mut(alice).unwrap().player_mut().unwrap().mounted = true;

        h.world.actor_mut(horse).unwrap().health = 0;
        assert_eq!(h.step(&env, horse), Dead);
        assert!(!h.world.actor(alice).unwrap().kind.is_mounted());
    }

    #[test]
    fn riders_drop_skill_requests() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let bob = fixtures::spawn_player(&mut h.world, &env, "bob");
        for (id, state) in [(alice, Idle), (bob, Moving)] {
            let actor = h.world.actor_mut(id).unwrap();
            actor.state = state;
            actor.skill_request = Some(skills::FORTIFY);
            actor.player_mut().unwrap().mounted = true;
        }
        h.world.actor_mut(bob).unwrap().motion = Motion::Destination(Position::new(9.0, 0.0));

        assert_eq!(h.step(&env, alice), Idle);
        assert_eq!(h.step(&env, bob), Moving);
        for id in [alice, bob] {
            let actor = h.world.actor(id).unwrap();
            assert_eq!(actor.skill_request, None);
            assert!(actor.active_cast.is_none());
        }
    }

    #[test]
    fn casting_ignores_requests_target_death_without_flag_and_move_end() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let goblin = fixtures::spawn_monster(&mut h.world, &env, Position::new(5.0, 0.0));
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.target = Some(goblin);
            actor.skill_request = Some(skills::FIREBALL);
        }
        assert_eq!(h.step(&env, alice), Casting);

        h.world.actor_mut(goblin).unwrap().health = 0;
        h.world.actor_mut(alice).unwrap().skill_request = Some(skills::STRIKE);
        h.advance(100);

        // Fireball does not cancel on target death; a queued request waits.
        assert_eq!(h.step(&env, alice), Casting);
        assert_eq!(h.world.actor(alice).unwrap().skill_request, Some(skills::STRIKE));
    }

    #[test]
    fn casting_aborts_on_lost_target_when_flagged() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let goblin = fixtures::spawn_monster(&mut h.world, &env, Position::new(1.0, 0.0));
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.target = Some(goblin);
            actor.skill_request = Some(skills::STRIKE);
        }
        assert_eq!(h.step(&env, alice), Casting);

        h.world.remove(goblin);
        assert_eq!(h.step(&env, alice), Idle);
        let actor = h.world.actor(alice).unwrap();
        assert!(actor.active_cast.is_none());
        assert_eq!(actor.target, None);
    }

    #[test]
    fn move_start_aborts_cast() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        h.world.actor_mut(alice).unwrap().skill_request = Some(skills::HEAL);
        assert_eq!(h.step(&env, alice), Casting);

        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.motion = Motion::Destination(Position::new(3.0, 0.0));
            actor.requests.motion = true;
        }
        assert_eq!(h.step(&env, alice), Idle);
        // the following tick picks the movement up
        assert_eq!(h.step(&env, alice), Moving);
    }

    #[test]
    fn finished_cast_applies_once_and_returns_to_idle() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let goblin = fixtures::spawn_monster(&mut h.world, &env, Position::new(1.0, 0.0));
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.target = Some(goblin);
            actor.skill_request = Some(skills::STRIKE);
        }
        assert_eq!(h.step(&env, alice), Casting);

        h.advance(1_000);
        assert_eq!(h.step(&env, alice), Idle);
        assert_eq!(h.step(&env, alice), Idle);

        assert_eq!(h.world.actor(goblin).unwrap().health, 60 - 41);
        assert_eq!(h.world.actor(alice).unwrap().casts_completed, 1);
    }

    #[test]
    fn stun_expiry_falls_through_to_idle_rules() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let now = h.world.time();
        h.world.actor_mut(alice).unwrap().stun_end = now + 500;

        assert_eq!(h.step(&env, alice), Stunned);
        h.world.actor_mut(alice).unwrap().skill_request = Some(skills::FORTIFY);
        assert_eq!(h.step(&env, alice), Stunned);

        h.advance(500);
        h.world.actor_mut(alice).unwrap().skill_request = Some(skills::FORTIFY);
        assert_eq!(h.step(&env, alice), Casting);
    }

    #[test]
    fn stun_cancels_cast() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        h.world.actor_mut(alice).unwrap().skill_request = Some(skills::HEAL);
        assert_eq!(h.step(&env, alice), Casting);

        let now = h.world.time();
        h.world.actor_mut(alice).unwrap().stun_end = now + 1_000;
        assert_eq!(h.step(&env, alice), Stunned);
        assert!(h.world.actor(alice).unwrap().active_cast.is_none());
    }

    #[test]
    fn dead_resets_stray_motion_and_respawns_on_request() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        h.world.actor_mut(alice).unwrap().health = 0;
        assert_eq!(h.step(&env, alice), Dead);

        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.motion = Motion::Destination(Position::new(2.0, 2.0));
            actor.position = Position::new(7.0, 7.0);
        }
        assert_eq!(h.step(&env, alice), Dead);
        assert_eq!(h.world.actor(alice).unwrap().motion, Motion::Idle);

        h.world.actor_mut(alice).unwrap().requests.respawn = true;
        assert_eq!(h.step(&env, alice), Idle);
        let actor = h.world.actor(alice).unwrap();
        assert_eq!(actor.position, Position::ORIGIN);
        assert_eq!(actor.health, 50);
    }

    #[test]
    fn death_keeps_pvp_status_and_drops_other_buffs() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let now = h.world.time();
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.buffs.apply("Offender", 1, now + 60_000);
            actor.buffs.apply("Haste", 1, now + 5_000);
            actor.health = 0;
        }

        assert_eq!(h.step(&env, alice), Dead);
        let buffs = &h.world.actor(alice).unwrap().buffs;
        assert!(buffs.has_active("Offender", now));
        assert!(!buffs.has_active("Haste", now));
    }

    #[test]
    fn monster_drops_loot_and_respawns_on_timer() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let spawn = Position::new(4.0, 4.0);
        let goblin = fixtures::spawn_monster(&mut h.world, &env, spawn);
        {
            let actor = h.world.actor_mut(goblin).unwrap();
            actor.position = Position::new(6.0, 6.0);
            actor.health = 0;
        }

        assert_eq!(h.step(&env, goblin), Dead);
        let data = h.world.actor(goblin).unwrap().monster().unwrap().clone();
        assert_eq!(data.loot_gold, 25);
        assert!(data.has_loot());

        h.advance(9_999);
        assert_eq!(h.step(&env, goblin), Dead);
        h.advance(1);
        assert_eq!(h.step(&env, goblin), Idle);

        let actor = h.world.actor(goblin).unwrap();
        assert_eq!(actor.position, spawn);
        assert_eq!(actor.health, 60);
        assert!(!actor.monster().unwrap().has_loot());
    }

    #[test]
    fn placeholder_states_hold_until_death() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        {
            let actor = h.world.actor_mut(alice).unwrap();
            actor.state = Trading;
            actor.requests.cancel = true;
            actor.skill_request = Some(skills::FORTIFY);
        }
        assert_eq!(h.step(&env, alice), Trading);

        h.world.actor_mut(alice).unwrap().health = 0;
        assert_eq!(h.step(&env, alice), Dead);
    }

    #[test]
    fn output_is_closed_over_arbitrary_event_mixes() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let mut h = harness();
        let alice = fixtures::spawn_player(&mut h.world, &env, "alice");
        let goblin = fixtures::spawn_monster(&mut h.world, &env, Position::new(1.0, 0.0));

        for round in 0u32..64 {
            {
                let now = h.world.time();
                let actor = h.world.actor_mut(alice).unwrap();
                actor.target = if round % 3 == 0 { Some(goblin) } else { None };
                actor.requests.cancel = round % 5 == 0;
                actor.requests.motion = round % 7 == 0;
                if round % 7 == 0 {
                    actor.motion = Motion::Destination(Position::new(2.0, 0.0));
                }
                if round % 11 == 0 {
                    actor.stun_end = now + 150;
                }
                actor.skill_request = Some((round as usize) % 7);
                if round == 40 {
                    actor.health = 0;
                }
                if round == 50 {
                    actor.requests.respawn = true;
                }
            }
            let state = h.step(&env, alice);
            assert!(matches!(state, Idle | Moving | Casting | Stunned | Dead));
            h.advance(100);
        }
    }
}
