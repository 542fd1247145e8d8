//! Event payloads published by the simulation worker.

use realm_core::{ActorCategory, ActorId, BehaviorState, WorldTime};
use serde::{Deserialize, Serialize};

/// Actor lifecycle and combat events, forwarded from engine hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned {
        actor: ActorId,
        name: String,
        category: ActorCategory,
    },
    Despawned {
        actor: ActorId,
        name: String,
    },
    Damaged {
        attacker: ActorId,
        victim: ActorId,
        amount: u32,
        killed: bool,
    },
    Died {
        actor: ActorId,
        time: WorldTime,
    },
    StateChanged {
        actor: ActorId,
        from: BehaviorState,
        to: BehaviorState,
    },
}

/// Player session and persistence events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    LoggedIn {
        name: String,
        actor: ActorId,
        /// Loaded from the repository rather than created fresh.
        restored: bool,
    },
    LoggedOut {
        name: String,
        actor: ActorId,
    },
    Saved {
        names: Vec<String>,
        online: bool,
    },
    SaveFailed {
        name: String,
        message: String,
    },
}
