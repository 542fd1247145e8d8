//! Replicated read model sent to clients.
//!
//! Timers are expressed as remaining milliseconds, since client and server
//! clocks are unrelated.

use crate::engine::movement_speed;
use crate::env::GameEnv;
use crate::state::{
    ActorCategory, ActorId, ActorRecord, BehaviorState, ItemStack, Motion, Position, Slot,
    WorldState, WorldTime,
};
use crate::stats::DerivedStats;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffSnapshot {
    pub name: String,
    pub level: u32,
    pub remaining_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSnapshot {
    pub name: String,
    pub level: u32,
    pub cast_remaining_ms: u64,
    pub cooldown_remaining_ms: u64,
}

/// Player-only slot contents.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub inventory: Vec<Slot>,
    pub equipment: Vec<Slot>,
    pub trash: Option<ItemStack>,
    pub skill_points: u32,
    pub mounted: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSnapshot {
    pub id: ActorId,
    pub name: String,
    pub category: ActorCategory,
    pub owner: Option<ActorId>,
    pub level: u32,
    pub position: Position,
    pub motion: Motion,
    /// Units per second, including the mount's speed for riders.
    pub speed: f32,
    pub state: BehaviorState,
    pub health: u32,
    pub health_max: u32,
    pub mana: u32,
    pub mana_max: u32,
    pub target: Option<ActorId>,
    pub current_skill: Option<usize>,
    pub skills: Vec<SkillSnapshot>,
    pub buffs: Vec<BuffSnapshot>,
    pub gold: u64,
    pub player: Option<PlayerSnapshot>,
    /// Dead monster with gold or items left to take.
    pub lootable: bool,
    /// Number of casts this actor has finished; moves by one per finished cast.
    pub casts_completed: u64,
    pub last_finished_skill: Option<usize>,
}

impl ActorSnapshot {
    pub fn capture(actor: &ActorRecord, env: &GameEnv<'_>, now: WorldTime) -> Self {
        let derived = DerivedStats::compute(actor, env, now);
        let player = actor.player().map(|data| PlayerSnapshot {
            inventory: data.inventory.slots().to_vec(),
            equipment: data.equipment.slots().to_vec(),
            trash: data.trash.clone(),
            skill_points: data.skill_points,
            mounted: data.mounted,
        });
        let lootable = actor.state == BehaviorState::Dead
            && actor.monster().is_some_and(|data| data.has_loot());

        Self {
            id: actor.id,
            name: actor.name.clone(),
            category: actor.kind.category(),
            owner: actor.kind.owner(),
            level: actor.level,
            position: actor.position,
            motion: actor.motion,
            speed: actor.base.speed,
            state: actor.state,
            health: actor.health,
            health_max: derived.health_max,
            mana: actor.mana,
            mana_max: derived.mana_max,
            target: actor.target,
            current_skill: actor.current_skill(),
            skills: actor
                .skills
                .iter()
                .map(|skill| SkillSnapshot {
                    name: skill.name.clone(),
                    level: skill.level,
                    cast_remaining_ms: now.remaining_until(skill.cast_time_end),
                    cooldown_remaining_ms: now.remaining_until(skill.cooldown_end),
                })
                .collect(),
            buffs: actor
                .buffs
                .active(now)
                .map(|buff| BuffSnapshot {
                    name: buff.name.clone(),
                    level: buff.level,
                    remaining_ms: now.remaining_until(buff.buff_time_end),
                })
                .collect(),
            gold: actor.gold,
            player,
            lootable,
            casts_completed: actor.casts_completed,
            last_finished_skill: actor.last_finished_skill,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    pub time: WorldTime,
    pub actors: Vec<ActorSnapshot>,
}

impl WorldSnapshot {
    pub fn capture(world: &WorldState, env: &GameEnv<'_>) -> Self {
        let now = world.time();
        Self {
            time: now,
            actors: world
                .actors()
                .map(|actor| ActorSnapshot {
                    speed: movement_speed(world, actor),
                    ..ActorSnapshot::capture(actor, env, now)
                })
                .collect(),
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorSnapshot> {
        self.actors.iter().find(|actor| actor.id == id)
    }
}
