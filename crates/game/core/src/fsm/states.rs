//! Per-state transition rules.
//!
//! Each function checks its events in a fixed priority order and returns the
//! next state. Unlisted events are ignored and the state holds.

use tracing::{debug, trace, warn};

use super::Events;
use crate::engine::HookRegistry;
use crate::env::GameEnv;
use crate::error::GameError;
use crate::skill;
use crate::state::{ActorId, ActorKind, ActorRecord, BehaviorState, Motion, WorldState};
use crate::stats::{DerivedStats, fill_resources};

pub(super) fn idle(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
    events: Events,
) -> BehaviorState {
    if events.contains(Events::DIED) {
        return enter_dead(world, env, hooks, id);
    }
    if events.contains(Events::STUNNED) {
        return enter_stunned(world, id);
    }
    let Some(actor) = world.actor_mut(id) else {
        return BehaviorState::Idle;
    };
    if events.contains(Events::CANCEL_ACTION) {
        actor.target = None;
        return BehaviorState::Idle;
    }
    if events.contains(Events::MOVE_START) {
        actor.skill_request = None;
        return BehaviorState::Moving;
    }
    if events.contains(Events::SKILL_REQUEST) {
        if drop_if_mounted(actor) {
            return BehaviorState::Idle;
        }
        if try_start_requested(world, env, id) {
            if let Some(actor) = world.actor_mut(id) {
                actor.reset_motion();
            }
            return BehaviorState::Casting;
        }
        return BehaviorState::Idle;
    }
    BehaviorState::Idle
}

pub(super) fn moving(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
    events: Events,
) -> BehaviorState {
    if events.contains(Events::DIED) {
        return enter_dead(world, env, hooks, id);
    }
    if events.contains(Events::STUNNED) {
        return enter_stunned(world, id);
    }
    if events.contains(Events::MOVE_END) {
        return BehaviorState::Idle;
    }
    let Some(actor) = world.actor_mut(id) else {
        return BehaviorState::Moving;
    };
    if events.contains(Events::CANCEL_ACTION) {
        // Motion is left to the predicting client.
        actor.skill_request = None;
        return BehaviorState::Idle;
    }
    if events.contains(Events::SKILL_REQUEST) {
        if drop_if_mounted(actor) {
            return BehaviorState::Moving;
        }
        // A destination walk slides to its end while the cast begins.
        // Steering has no end, so it stops like a cast from IDLE.
        if try_start_requested(world, env, id) {
            if let Some(actor) = world.actor_mut(id)
                && matches!(actor.motion, Motion::Velocity(_))
            {
                actor.reset_motion();
            }
            return BehaviorState::Casting;
        }
        return BehaviorState::Moving;
    }
    BehaviorState::Moving
}

pub(super) fn casting(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
    events: Events,
) -> BehaviorState {
    if events.contains(Events::DIED) {
        return enter_dead(world, env, hooks, id);
    }
    if events.contains(Events::STUNNED) {
        skill::cancel_cast(world, id);
        return enter_stunned(world, id);
    }
    if events.contains(Events::MOVE_START) {
        skill::cancel_cast(world, id);
        if let Some(actor) = world.actor_mut(id) {
            actor.skill_request = None;
        }
        return BehaviorState::Idle;
    }
    if events.contains(Events::CANCEL_ACTION) {
        skill::cancel_cast(world, id);
        if let Some(actor) = world.actor_mut(id) {
            actor.skill_request = None;
        }
        return BehaviorState::Idle;
    }
    if events.intersects(Events::TARGET_DISAPPEARED | Events::TARGET_DIED)
        && cancels_on_lost_target(world, env, id)
    {
        skill::cancel_cast(world, id);
        return BehaviorState::Idle;
    }
    if events.contains(Events::SKILL_FINISHED) {
        skill::finish_cast(world, env, hooks, id);
        return BehaviorState::Idle;
    }
    BehaviorState::Casting
}

pub(super) fn stunned(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
    events: Events,
) -> BehaviorState {
    if events.contains(Events::DIED) {
        return enter_dead(world, env, hooks, id);
    }
    if events.contains(Events::STUNNED) {
        return BehaviorState::Stunned;
    }
    // Stun expired: react as IDLE within the same transition.
    idle(world, env, hooks, id, events)
}

pub(super) fn dead(world: &mut WorldState, env: &GameEnv<'_>, id: ActorId, events: Events) -> BehaviorState {
    let Some(actor) = world.actor_mut(id) else {
        return BehaviorState::Dead;
    };
    if events.contains(Events::MOVE_START) || actor.motion.is_moving() {
        warn!(
            target: "realm::fsm",
            actor = %id,
            motion = ?actor.motion,
            "movement while dead; motion reset"
        );
        actor.reset_motion();
    }
    if events.contains(Events::RESPAWN) {
        respawn(world, env, id);
        return BehaviorState::Idle;
    }
    BehaviorState::Dead
}

/// `TRADING` and `CRAFTING` hold until death pre-empts them.
pub(super) fn placeholder(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
    state: BehaviorState,
    events: Events,
) -> BehaviorState {
    if events.contains(Events::DIED) {
        return enter_dead(world, env, hooks, id);
    }
    state
}

/// Riders cannot cast; the request is dropped.
fn drop_if_mounted(actor: &mut ActorRecord) -> bool {
    if !actor.kind.is_mounted() {
        return false;
    }
    actor.skill_request = None;
    debug!(target: "realm::fsm", actor = %actor.id, "skill request dropped while mounted");
    true
}

/// Consumes the pending skill request and tries to start it.
fn try_start_requested(world: &mut WorldState, env: &GameEnv<'_>, id: ActorId) -> bool {
    let Some(index) = world.actor_mut(id).and_then(|actor| actor.skill_request.take()) else {
        return false;
    };
    match skill::start_cast(world, env, id, index) {
        Ok(()) => true,
        Err(err) => {
            let severity = err.severity();
            if severity.is_recoverable() {
                trace!(target: "realm::fsm", actor = %id, skill = index, error = %err, "cast not ready");
            } else if severity.is_internal() {
                warn!(target: "realm::fsm", actor = %id, skill = index, error = %err, "cast attempt failed");
            } else {
                debug!(target: "realm::fsm", actor = %id, skill = index, error = %err, "cast attempt failed");
            }
            false
        }
    }
}

fn cancels_on_lost_target(world: &WorldState, env: &GameEnv<'_>, id: ActorId) -> bool {
    world
        .actor(id)
        .and_then(|actor| actor.active_cast.as_ref())
        .and_then(|cast| env.skill(&cast.skill_name).ok())
        .is_some_and(|def| def.cancel_cast_if_target_died)
}

fn enter_stunned(world: &mut WorldState, id: ActorId) -> BehaviorState {
    if let Some(actor) = world.actor_mut(id) {
        actor.reset_motion();
        actor.skill_request = None;
    }
    BehaviorState::Stunned
}

/// Death side effects. The state is set before hooks run so they observe
/// the actor as dead.
fn enter_dead(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    id: ActorId,
) -> BehaviorState {
    skill::cancel_cast(world, id);
    let now = world.time();
    let rules = env.rules().ok();
    let template = world
        .actor(id)
        .and_then(|actor| env.template(actor.kind.template()).ok());

    let Some(actor) = world.actor_mut(id) else {
        return BehaviorState::Dead;
    };
    actor.state = BehaviorState::Dead;
    actor.reset_motion();
    actor.skill_request = None;
    actor.target = None;
    actor.stun_end = now;
    actor.requests = Default::default();
    actor.buffs.retain(|buff| {
        rules.is_some_and(|rules| rules.is_pvp_status(&buff.name))
            || env
                .buff(&buff.name)
                .is_ok_and(|def| def.remain_after_death)
    });

    let mut rider = None;
    match &mut actor.kind {
        ActorKind::Monster(data) => {
            if let Some(template) = template {
                data.loot_gold = template.loot_gold;
                data.loot_items = template.loot_items.iter().cloned().map(Some).collect();
                data.respawn_at = template.respawn_ms.map(|ms| now + ms);
            }
        }
        ActorKind::Player(data) => data.mounted = false,
        ActorKind::Mount(data) => rider = Some(data.owner),
        ActorKind::Npc(_) | ActorKind::Pet(_) => {}
    }
    // A dead mount throws its rider.
    if let Some(player) = rider
        .and_then(|owner| world.actor_mut(owner))
        .and_then(ActorRecord::player_mut)
        .filter(|player| player.mount == Some(id))
    {
        player.mounted = false;
    }

    debug!(target: "realm::fsm", actor = %id, "died");
    hooks.died(world, env, id);
    BehaviorState::Dead
}

fn respawn(world: &mut WorldState, env: &GameEnv<'_>, id: ActorId) {
    let now = world.time();
    let rules = env.rules().ok();
    let Some(actor) = world.actor_mut(id) else {
        return;
    };
    actor.reset_motion();
    actor.stun_end = now;

    match &mut actor.kind {
        ActorKind::Monster(data) => {
            data.loot_gold = 0;
            data.loot_items.clear();
            data.respawn_at = None;
            actor.position = actor.spawn_position;
            fill_resources(actor, env, now);
        }
        ActorKind::Player(_) | ActorKind::Npc(_) | ActorKind::Pet(_) | ActorKind::Mount(_) => {
            let fraction = rules.map(|rules| rules.respawn_health_fraction).unwrap_or(1.0);
            if let Some(rules) = rules {
                actor.position = rules.revival_point;
            }
            let health_max = DerivedStats::compute(actor, env, now).health_max;
            actor.health = ((health_max as f32 * fraction) as u32).clamp(1, health_max.max(1));
        }
    }
    debug!(target: "realm::fsm", actor = %id, position = ?actor.position, "respawned");
}
