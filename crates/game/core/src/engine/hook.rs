//! Extension points fired by the engine at actor lifecycle events.
//!
//! External modules implement [`WorldHook`] and register it in a
//! [`HookRegistry`] at startup. Hooks run synchronously inside the tick, in
//! priority order (lower values first).

use std::fmt;
use std::sync::Arc;

use crate::env::GameEnv;
use crate::state::{ActorId, ActorRecord, BehaviorState, WorldState};

/// One resolved damage application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageEvent {
    pub attacker: ActorId,
    pub victim: ActorId,
    pub amount: u32,
    /// The hit brought the victim to zero health.
    pub killed: bool,
    /// The victim side carried no PvP status before the hit landed.
    pub victim_innocent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub actor: ActorId,
    pub from: BehaviorState,
    pub to: BehaviorState,
}

/// Lifecycle extension point. Every method defaults to a no-op.
pub trait WorldHook: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    /// Returns the priority of this hook. Lower values execute first.
    fn priority(&self) -> i32 {
        0
    }

    fn on_spawn(&self, _world: &mut WorldState, _env: &GameEnv<'_>, _actor: ActorId) {}

    /// Fired after the actor left the world; `actor` is the removed record.
    fn on_despawn(&self, _world: &mut WorldState, _env: &GameEnv<'_>, _actor: &ActorRecord) {}

    fn on_damage_dealt(&self, _world: &mut WorldState, _env: &GameEnv<'_>, _event: &DamageEvent) {
    }

    fn on_death(&self, _world: &mut WorldState, _env: &GameEnv<'_>, _actor: ActorId) {}

    fn on_state_changed(&self, _world: &WorldState, _change: &StateChange) {}
}

/// Priority-ordered set of hooks shared by every engine invocation.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn WorldHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Registry with the built-in PvP status hook.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::pvp::PvpStatusHook));
        registry
    }

    /// Adds a hook, keeping the registry sorted by priority. Hooks with equal
    /// priority run in registration order.
    pub fn register(&mut self, hook: Arc<dyn WorldHook>) {
        let at = self
            .hooks
            .partition_point(|existing| existing.priority() <= hook.priority());
        self.hooks.insert(at, hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn spawned(&self, world: &mut WorldState, env: &GameEnv<'_>, actor: ActorId) {
        for hook in &self.hooks {
            hook.on_spawn(world, env, actor);
        }
    }

    pub fn despawned(&self, world: &mut WorldState, env: &GameEnv<'_>, actor: &ActorRecord) {
        for hook in &self.hooks {
            hook.on_despawn(world, env, actor);
        }
    }

    pub fn damage_dealt(&self, world: &mut WorldState, env: &GameEnv<'_>, event: &DamageEvent) {
        for hook in &self.hooks {
            hook.on_damage_dealt(world, env, event);
        }
    }

    pub fn died(&self, world: &mut WorldState, env: &GameEnv<'_>, actor: ActorId) {
        for hook in &self.hooks {
            hook.on_death(world, env, actor);
        }
    }

    pub fn state_changed(&self, world: &WorldState, change: &StateChange) {
        for hook in &self.hooks {
            hook.on_state_changed(world, change);
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}
