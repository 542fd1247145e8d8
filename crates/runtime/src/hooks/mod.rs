//! Runtime hooks registered with the engine.
//!
//! The engine fires [`WorldHook`] callbacks synchronously inside the tick. The
//! runtime's own hook republishes them on the [`EventBus`] so that observers
//! outside the worker (session layers, tests, tools) can follow the world
//! without touching it.

use realm_core::engine::DamageEvent;
use realm_core::{ActorId, ActorRecord, GameEnv, StateChange, WorldHook, WorldState};

use crate::events::{Event, EventBus, WorldEvent};

/// Forwards lifecycle callbacks to [`Topic::World`](crate::events::Topic::World).
///
/// Runs after every gameplay hook so that published events reflect their
/// side effects.
pub struct EventForwardingHook {
    bus: EventBus,
}

impl EventForwardingHook {
    pub const PRIORITY: i32 = 1_000;

    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl WorldHook for EventForwardingHook {
    fn name(&self) -> &'static str {
        "event-forwarding"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn on_spawn(&self, world: &mut WorldState, _env: &GameEnv<'_>, actor: ActorId) {
        let Some(record) = world.actor(actor) else {
            return;
        };
        self.bus.publish(Event::World(WorldEvent::Spawned {
            actor,
            name: record.name.clone(),
            category: record.kind.category(),
        }));
    }

    fn on_despawn(&self, _world: &mut WorldState, _env: &GameEnv<'_>, actor: &ActorRecord) {
        self.bus.publish(Event::World(WorldEvent::Despawned {
            actor: actor.id,
            name: actor.name.clone(),
        }));
    }

    fn on_damage_dealt(&self, _world: &mut WorldState, _env: &GameEnv<'_>, event: &DamageEvent) {
        self.bus.publish(Event::World(WorldEvent::Damaged {
            attacker: event.attacker,
            victim: event.victim,
            amount: event.amount,
            killed: event.killed,
        }));
    }

    fn on_death(&self, world: &mut WorldState, _env: &GameEnv<'_>, actor: ActorId) {
        self.bus.publish(Event::World(WorldEvent::Died {
            actor,
            time: world.time(),
        }));
    }

    fn on_state_changed(&self, _world: &WorldState, change: &StateChange) {
        self.bus.publish(Event::World(WorldEvent::StateChanged {
            actor: change.actor,
            from: change.from,
            to: change.to,
        }));
    }
}
