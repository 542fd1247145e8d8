//! World tick and command intake.
//!
//! The [`WorldEngine`] is the authoritative driver for [`WorldState`]. Commands
//! enter through [`WorldEngine::submit`] and only ever set intents; all state
//! transitions happen inside [`WorldEngine::tick`], one fixed sequence per
//! tick:
//!
//! ```text
//! set clock ──► advance motion ──► expire buffs ──► FSM per actor ──► death sweep
//! ```

mod hook;

pub use hook::{DamageEvent, HookRegistry, StateChange, WorldHook};

use tracing::{debug, trace};

use crate::command::{self, Request};
use crate::env::{GameEnv, MovementAgent, StraightLineAgent};
use crate::fsm;
use crate::spawn::{self, SpawnError};
use crate::state::{ActorId, ActorKind, ActorRecord, BehaviorState, Position, WorldState, WorldTime};
use crate::stats::clamp_resources;

static FALLBACK_AGENT: StraightLineAgent = StraightLineAgent;

/// Summary of one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub time: WorldTime,
    /// State changes in the order they happened.
    pub transitions: Vec<StateChange>,
}

pub struct WorldEngine<'a> {
    world: &'a mut WorldState,
    hooks: &'a HookRegistry,
}

impl<'a> WorldEngine<'a> {
    pub fn new(world: &'a mut WorldState, hooks: &'a HookRegistry) -> Self {
        Self { world, hooks }
    }

    pub fn world(&self) -> &WorldState {
        self.world
    }

    /// Passes a command through the gate. Returns whether it was applied.
    pub fn submit(&mut self, env: &GameEnv<'_>, request: &Request) -> bool {
        command::handle(self.world, env, request)
    }

    /// Like [`submit`](Self::submit) but reports the rejection reason.
    pub fn try_submit(
        &mut self,
        env: &GameEnv<'_>,
        request: &Request,
    ) -> Result<(), command::CommandRejection> {
        command::try_handle(self.world, env, request)
    }

    /// Advances the world to `now`. A clock value in the past is treated as
    /// the current time.
    pub fn tick(&mut self, env: &GameEnv<'_>, now: WorldTime) -> TickReport {
        let previous = self.world.time();
        self.world.set_time(now);
        let now = self.world.time();
        let elapsed = now.since(previous);

        self.advance_motion(env, elapsed);
        self.expire_buffs(env, now);

        let mut report = TickReport {
            time: now,
            transitions: Vec::new(),
        };
        let ids = self.world.ids();
        for id in &ids {
            self.step(env, *id, &mut report);
        }

        // Actors killed after their own update this tick die now, not next tick.
        for id in ids {
            let died_late = self
                .world
                .actor(id)
                .is_some_and(|actor| !actor.is_alive() && actor.state != BehaviorState::Dead);
            if died_late {
                self.step(env, id, &mut report);
            }
        }

        trace!(target: "realm::engine", time = %now, transitions = report.transitions.len(), "tick");
        report
    }

    fn step(&mut self, env: &GameEnv<'_>, id: ActorId, report: &mut TickReport) {
        let Some(from) = self.world.actor(id).map(|actor| actor.state) else {
            return;
        };
        if let Some(to) = fsm::update(self.world, env, self.hooks, id)
            && to != from
        {
            report.transitions.push(StateChange { actor: id, from, to });
        }
    }

    fn advance_motion(&mut self, env: &GameEnv<'_>, elapsed_ms: u64) {
        if elapsed_ms == 0 {
            return;
        }
        let agent: &dyn MovementAgent = match env.movement() {
            Ok(agent) => agent,
            Err(_) => &FALLBACK_AGENT,
        };

        for id in self.world.ids() {
            let Some(actor) = self.world.actor(id) else {
                continue;
            };
            if !actor.motion.is_moving() || !actor.state.is_active() {
                continue;
            }
            let speed = movement_speed(self.world, actor);
            let (from, motion) = (actor.position, actor.motion);
            let (position, motion) = agent.advance(from, motion, speed, elapsed_ms);
            if !position.is_finite() {
                continue;
            }

            let mount = match self.world.actor_mut(id) {
                Some(actor) => {
                    actor.position = position;
                    actor.motion = motion;
                    mounted_on(actor)
                }
                None => None,
            };
            // A ridden mount travels with its rider.
            if let Some(mount) = mount.and_then(|mount| self.world.actor_mut(mount)) {
                mount.position = position;
            }
        }
    }

    fn expire_buffs(&mut self, env: &GameEnv<'_>, now: WorldTime) {
        for actor in self.world.actors_mut() {
            if actor.buffs.sweep(now) {
                clamp_resources(actor, env, now);
            }
        }
    }

    pub fn spawn(
        &mut self,
        env: &GameEnv<'_>,
        template: &str,
        position: Position,
        owner: Option<ActorId>,
    ) -> Result<ActorId, SpawnError> {
        let id = spawn::spawn(self.world, env, template, position, owner)?;
        self.hooks.spawned(self.world, env, id);
        Ok(id)
    }

    pub fn spawn_player(
        &mut self,
        env: &GameEnv<'_>,
        template: &str,
        name: &str,
        position: Position,
    ) -> Result<ActorId, SpawnError> {
        let id = spawn::spawn_player(self.world, env, template, name, position)?;
        self.hooks.spawned(self.world, env, id);
        Ok(id)
    }

    /// Inserts a fully built record, such as a restored character.
    pub fn insert(&mut self, env: &GameEnv<'_>, actor: ActorRecord) -> ActorId {
        let id = actor.id;
        self.world.insert(actor);
        self.hooks.spawned(self.world, env, id);
        id
    }

    /// Removes an actor. A player's companions leave with it; a companion is
    /// unlinked from its owner. Returns the removed record.
    pub fn despawn(&mut self, env: &GameEnv<'_>, id: ActorId) -> Option<ActorRecord> {
        let actor = self.world.remove(id)?;
        match &actor.kind {
            ActorKind::Player(player) => {
                for companion in [player.pet, player.mount].into_iter().flatten() {
                    if let Some(companion) = self.world.remove(companion) {
                        self.hooks.despawned(self.world, env, &companion);
                    }
                }
            }
            ActorKind::Pet(data) | ActorKind::Mount(data) => {
                if let Some(owner) = self
                    .world
                    .actor_mut(data.owner)
                    .and_then(ActorRecord::player_mut)
                {
                    if owner.pet == Some(id) {
                        owner.pet = None;
                    }
                    if owner.mount == Some(id) {
                        owner.mount = None;
                        owner.mounted = false;
                    }
                }
            }
            ActorKind::Monster(_) | ActorKind::Npc(_) => {}
        }
        debug!(target: "realm::engine", actor = %id, name = %actor.name, "despawned");
        self.hooks.despawned(self.world, env, &actor);
        Some(actor)
    }
}

/// Movement speed in units per second. Riders move at their mount's speed.
pub fn movement_speed(world: &WorldState, actor: &ActorRecord) -> f32 {
    mounted_on(actor)
        .and_then(|mount| world.actor(mount))
        .map_or(actor.base.speed, |mount| mount.base.speed)
}

fn mounted_on(actor: &ActorRecord) -> Option<ActorId> {
    actor
        .player()
        .filter(|player| player.mounted)
        .and_then(|player| player.mount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::fixtures::{self, skills};
    use crate::state::BehaviorState::*;

    #[test]
    fn move_command_walks_to_destination_then_idles() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let hooks = HookRegistry::with_defaults();
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let start = world.time();
        let mut engine = WorldEngine::new(&mut world, &hooks);

        assert!(engine.submit(
            &env,
            &Request::own(alice, Command::Move { destination: Position::new(5.0, 0.0) })
        ));
        engine.tick(&env, start);
        assert_eq!(engine.world().actor(alice).unwrap().state, Moving);

        // speed 5: half a second covers half the way
        engine.tick(&env, start + 500);
        assert_eq!(engine.world().actor(alice).unwrap().position, Position::new(2.5, 0.0));

        let report = engine.tick(&env, start + 1_000);
        let actor = engine.world().actor(alice).unwrap();
        assert_eq!(actor.position, Position::new(5.0, 0.0));
        assert_eq!(actor.state, Idle);
        assert_eq!(
            report.transitions,
            vec![StateChange { actor: alice, from: Moving, to: Idle }]
        );
    }

    #[test]
    fn kill_lands_in_the_same_tick_regardless_of_update_order() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let hooks = HookRegistry::with_defaults();
        let mut world = fixtures::world();
        // The goblin gets the lower id, so it updates before alice finishes.
        let goblin = fixtures::spawn_monster(&mut world, &env, Position::new(1.0, 0.0));
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        world.actor_mut(goblin).unwrap().health = 10;
        let start = world.time();
        let mut engine = WorldEngine::new(&mut world, &hooks);

        engine.submit(&env, &Request::own(alice, Command::SetTarget { target: Some(goblin) }));
        engine.submit(&env, &Request::own(alice, Command::UseSkill { index: skills::STRIKE }));
        engine.tick(&env, start);
        let report = engine.tick(&env, start + 1_000);

        assert_eq!(engine.world().actor(goblin).unwrap().state, Dead);
        assert!(report.transitions.contains(&StateChange { actor: goblin, from: Idle, to: Dead }));
    }

    #[test]
    fn expired_buffs_clamp_resources() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let hooks = HookRegistry::new();
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let start = world.time();
        {
            let actor = world.actor_mut(alice).unwrap();
            actor.buffs.apply("Fortify", 1, start + 1_000);
            actor.health = 130;
        }
        let mut engine = WorldEngine::new(&mut world, &hooks);

        engine.tick(&env, start + 500);
        assert_eq!(engine.world().actor(alice).unwrap().health, 130);
        engine.tick(&env, start + 1_000);
        assert_eq!(engine.world().actor(alice).unwrap().health, 100);
    }

    #[test]
    fn riders_move_at_mount_speed() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let hooks = HookRegistry::new();
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let start = world.time();
        let mut engine = WorldEngine::new(&mut world, &hooks);
        let horse = engine.spawn(&env, "Horse", Position::ORIGIN, Some(alice)).unwrap();
        assert!(engine.submit(&env, &Request::own(alice, Command::ToggleMount)));

        engine.submit(
            &env,
            &Request::own(alice, Command::Move { destination: Position::new(20.0, 0.0) }),
        );
        engine.tick(&env, start);
        engine.tick(&env, start + 1_000);

        assert_eq!(engine.world().actor(alice).unwrap().position, Position::new(8.0, 0.0));
        assert_eq!(engine.world().actor(horse).unwrap().position, Position::new(8.0, 0.0));
    }

    #[test]
    fn despawning_a_player_takes_its_companions() {
        let content = fixtures::content();
        let env = fixtures::env(&content);
        let hooks = HookRegistry::new();
        let mut world = fixtures::world();
        let alice = fixtures::spawn_player(&mut world, &env, "alice");
        let mut engine = WorldEngine::new(&mut world, &hooks);
        let wolf = engine.spawn(&env, "Wolf", Position::ORIGIN, Some(alice)).unwrap();

        let removed = engine.despawn(&env, alice).unwrap();

        assert_eq!(removed.name, "alice");
        assert!(!engine.world().contains(wolf));
        assert_eq!(engine.world().player_id("alice"), None);
    }
}
