//! Authoritative world state.
//!
//! [`WorldState`] owns every actor record, the id allocator, the world clock
//! and the name index of online players. It is passed explicitly to every
//! component that needs actor lookup; nothing in this crate is global.
mod actor;
mod behavior;
mod common;

use std::collections::{BTreeMap, HashMap};

pub use actor::{
    ActiveCast, ActorCategory, ActorKind, ActorRecord, BaseStats, Buff, Buffs, CompanionData, EQUIPMENT_LAYOUT,
    Equipment, Inventory, ItemStack, MonsterData, Motion, NpcData, PlayerData, Requests, Skill,
    Slot, can_attack,
};
pub use behavior::BehaviorState;
pub use common::{ActorId, Position, Velocity, WorldTime};

#[derive(Clone, Debug, Default)]
pub struct WorldState {
    time: WorldTime,
    /// Sequential id allocator. Ids are never reused.
    next_id: u32,
    actors: BTreeMap<ActorId, ActorRecord>,
    players: HashMap<String, ActorId>,
}

impl WorldState {
    pub fn new() -> Self {
        Self {
            time: WorldTime::ZERO,
            next_id: 1,
            actors: BTreeMap::new(),
            players: HashMap::new(),
        }
    }

    pub fn time(&self) -> WorldTime {
        self.time
    }

    /// Advances the clock. Time never moves backwards.
    pub fn set_time(&mut self, time: WorldTime) {
        self.time = self.time.max(time);
    }

    pub fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Inserts a fully built record. Players are indexed by name.
    pub fn insert(&mut self, actor: ActorRecord) {
        if actor.kind.is_player() {
            self.players.insert(actor.name.clone(), actor.id);
        }
        self.next_id = self.next_id.max(actor.id.0.saturating_add(1));
        self.actors.insert(actor.id, actor);
    }

    pub fn remove(&mut self, id: ActorId) -> Option<ActorRecord> {
        let actor = self.actors.remove(&id)?;
        if actor.kind.is_player() && self.players.get(&actor.name) == Some(&id) {
            self.players.remove(&actor.name);
        }
        Some(actor)
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorRecord> {
        self.actors.get_mut(&id)
    }

    /// Mutable access to two distinct actors at once.
    pub fn pair_mut(
        &mut self,
        a: ActorId,
        b: ActorId,
    ) -> Option<(&mut ActorRecord, &mut ActorRecord)> {
        if a == b {
            return None;
        }
        let mut first = None;
        let mut second = None;
        for (id, actor) in self.actors.iter_mut() {
            if *id == a {
                first = Some(actor);
            } else if *id == b {
                second = Some(actor);
            }
        }
        Some((first?, second?))
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn player_id(&self, name: &str) -> Option<ActorId> {
        self.players.get(name).copied()
    }

    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorRecord> {
        self.actors.values()
    }

    pub fn actors_mut(&mut self) -> impl Iterator<Item = &mut ActorRecord> {
        self.actors.values_mut()
    }

    pub fn players(&self) -> impl Iterator<Item = &ActorRecord> {
        self.players.values().filter_map(|id| self.actors.get(id))
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
