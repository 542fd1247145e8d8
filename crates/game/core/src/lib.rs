//! Server-authoritative behavior core shared by the runtime and clients.
//!
//! `realm-core` defines the canonical rules (actor records, the per-actor
//! state machine, the skill pipeline, the command gate and PvP status) and
//! exposes synchronous APIs with no I/O. All authoritative mutation flows
//! through [`engine::WorldEngine`]; clients reuse the same types and checks
//! for prediction.
pub mod command;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod fsm;
pub mod persist;
pub mod pvp;
pub mod skill;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod stats;

#[cfg(test)]
mod fixtures;

pub use command::{Command, CommandRejection, Request};
pub use config::GameConfig;
pub use engine::{DamageEvent, HookRegistry, StateChange, TickReport, WorldEngine, WorldHook};
pub use env::{
    ActorOracle, ActorTemplate, ConfigOracle, ContentSnapshot, Env, GameEnv, ItemCategory,
    ItemDefinition, ItemOracle, MovementAgent, OracleError, SkillDefinition, SkillOracle,
    StraightLineAgent, WorldRules,
};
pub use error::{ErrorSeverity, GameError};
pub use fsm::Events;
pub use persist::{CharacterRecord, RestoreWarning};
pub use pvp::PvpStatusHook;
pub use skill::{CastError, Reach};
pub use snapshot::{ActorSnapshot, WorldSnapshot};
pub use spawn::SpawnError;
pub use state::{
    ActorCategory, ActorId, ActorKind, ActorRecord, BehaviorState, Motion, Position, Velocity,
    WorldState, WorldTime,
};
