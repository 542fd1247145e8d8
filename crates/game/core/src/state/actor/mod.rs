//! The Actor Record: the data entity every other component reads and mutates.
//!
//! Health and mana maxima are not stored; see [`crate::stats`].

mod equipment;
mod inventory;
mod kind;
mod skills;

pub use equipment::{EQUIPMENT_LAYOUT, Equipment};
pub use inventory::{Inventory, ItemStack, Slot};
pub use kind::{ActorCategory, ActorKind, CompanionData, MonsterData, NpcData, PlayerData, can_attack};
pub use skills::{Buff, Buffs, Skill};

use crate::state::{ActorId, BehaviorState, Position, Velocity, WorldTime};

/// Base values an actor is created with, before level growth and bonuses.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub health_max: u32,
    pub health_per_level: u32,
    pub mana_max: u32,
    pub mana_per_level: u32,
    pub damage: u32,
    pub damage_per_level: u32,
    pub defense: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
}

/// What the movement agent is currently doing with an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motion {
    #[default]
    Idle,
    Destination(Position),
    Velocity(Velocity),
}

impl Motion {
    pub fn is_moving(&self) -> bool {
        match self {
            Self::Idle => false,
            Self::Destination(_) => true,
            Self::Velocity(velocity) => !velocity.is_zero(),
        }
    }
}

/// Parameters committed when a cast starts.
///
/// The effect is applied with `level` even if the skill is upgraded while
/// the cast is in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveCast {
    pub skill_index: usize,
    pub skill_name: String,
    pub level: u32,
    pub target: Option<ActorId>,
    pub cast_time_end: WorldTime,
}

/// One-shot request flags. Each is consumed by the tick that observes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requests {
    pub cancel: bool,
    pub respawn: bool,
    /// A movement command arrived since the last tick.
    pub motion: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorRecord {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub level: u32,
    pub health: u32,
    pub mana: u32,
    pub base: BaseStats,

    pub position: Position,
    pub spawn_position: Position,
    pub motion: Motion,

    pub state: BehaviorState,
    pub target: Option<ActorId>,
    pub skills: Vec<Skill>,
    pub buffs: Buffs,
    pub gold: u64,

    pub active_cast: Option<ActiveCast>,
    /// Skill index requested by the controller, evaluated by the state machine.
    pub skill_request: Option<usize>,
    pub stun_end: WorldTime,
    pub requests: Requests,

    pub casts_completed: u64,
    pub last_finished_skill: Option<usize>,
}

impl ActorRecord {
    /// Creates an idle actor at `position` with empty resources. Callers fill
    /// health and mana once maxima can be computed.
    pub fn new(
        id: ActorId,
        name: impl Into<String>,
        kind: ActorKind,
        level: u32,
        base: BaseStats,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            level: level.max(1),
            health: 0,
            mana: 0,
            base,
            position,
            spawn_position: position,
            motion: Motion::Idle,
            state: BehaviorState::Idle,
            target: None,
            skills: Vec::new(),
            buffs: Buffs::new(),
            gold: 0,
            active_cast: None,
            skill_request: None,
            stun_end: WorldTime::ZERO,
            requests: Requests::default(),
            casts_completed: 0,
            last_finished_skill: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_stunned(&self, now: WorldTime) -> bool {
        now < self.stun_end
    }

    /// Index of the skill currently being cast.
    pub fn current_skill(&self) -> Option<usize> {
        self.active_cast.as_ref().map(|cast| cast.skill_index)
    }

    pub fn player(&self) -> Option<&PlayerData> {
        match &self.kind {
            ActorKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            ActorKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn monster(&self) -> Option<&MonsterData> {
        match &self.kind {
            ActorKind::Monster(data) => Some(data),
            _ => None,
        }
    }

    pub fn monster_mut(&mut self) -> Option<&mut MonsterData> {
        match &mut self.kind {
            ActorKind::Monster(data) => Some(data),
            _ => None,
        }
    }

    pub fn reset_motion(&mut self) {
        self.motion = Motion::Idle;
        self.requests.motion = false;
    }

    pub fn skill_index(&self, name: &str) -> Option<usize> {
        self.skills.iter().position(|skill| skill.name == name)
    }
}
