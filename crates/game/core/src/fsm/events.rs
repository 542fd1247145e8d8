//! Per-tick event detection.

use bitflags::bitflags;

use crate::state::{ActorId, ActorKind, BehaviorState, WorldState};

bitflags! {
    /// Boolean events derived from an actor record once per tick.
    ///
    /// `CANCEL_ACTION`, `RESPAWN` and the requested part of `MOVE_START` are
    /// edge-triggered: their request flags are consumed when detected.
    /// Everything else is level-triggered.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Events: u16 {
        const DIED = 1 << 0;
        const STUNNED = 1 << 1;
        const CANCEL_ACTION = 1 << 2;
        const MOVE_START = 1 << 3;
        const MOVE_END = 1 << 4;
        const SKILL_REQUEST = 1 << 5;
        const SKILL_FINISHED = 1 << 6;
        const TARGET_DIED = 1 << 7;
        const TARGET_DISAPPEARED = 1 << 8;
        const RESPAWN = 1 << 9;
    }
}

/// Detects the events of `id` for this tick, consuming one-shot requests.
///
/// While casting, target events refer to the committed cast target.
pub fn detect(world: &mut WorldState, id: ActorId) -> Events {
    let now = world.time();
    let Some(actor) = world.actor(id) else {
        return Events::empty();
    };

    let watched = match &actor.active_cast {
        Some(cast) if actor.state == BehaviorState::Casting => cast.target,
        _ => actor.target,
    };
    let target_state = watched.map(|target| world.actor(target).map(|t| t.is_alive()));

    let mut events = Events::empty();
    match target_state {
        Some(None) => events |= Events::TARGET_DISAPPEARED,
        Some(Some(false)) => events |= Events::TARGET_DIED,
        _ => {}
    }

    let Some(actor) = world.actor_mut(id) else {
        return Events::empty();
    };

    if actor.health == 0 {
        events |= Events::DIED;
    }
    if actor.is_stunned(now) {
        events |= Events::STUNNED;
    }
    if std::mem::take(&mut actor.requests.cancel) {
        events |= Events::CANCEL_ACTION;
    }
    let motion_requested = std::mem::take(&mut actor.requests.motion);
    if motion_requested || (actor.state == BehaviorState::Idle && actor.motion.is_moving()) {
        events |= Events::MOVE_START;
    }
    if actor.state == BehaviorState::Moving && !actor.motion.is_moving() {
        events |= Events::MOVE_END;
    }
    if actor.skill_request.is_some() {
        events |= Events::SKILL_REQUEST;
    }
    if actor
        .active_cast
        .as_ref()
        .is_some_and(|cast| now >= cast.cast_time_end)
    {
        events |= Events::SKILL_FINISHED;
    }

    let respawn = match &actor.kind {
        ActorKind::Monster(data) => data.respawn_at.is_some_and(|at| now >= at),
        ActorKind::Player(_) | ActorKind::Npc(_) | ActorKind::Pet(_) | ActorKind::Mount(_) => {
            false
        }
    };
    if std::mem::take(&mut actor.requests.respawn) || respawn {
        events |= Events::RESPAWN;
    }

    if events.contains(Events::TARGET_DISAPPEARED) && actor.target == watched {
        actor.target = None;
    }
    events
}
