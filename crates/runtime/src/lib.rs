//! Runtime orchestration for the authoritative world simulation.
//!
//! This crate wires together oracle access, the character repositories and
//! the simulation worker into a cohesive runtime API. Consumers embed
//! [`Runtime`] to host a world, log players in and out, submit commands and
//! subscribe to events through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
//! - [`hooks`] connects engine extension points to the event bus
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod config;
pub mod events;
pub mod hooks;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{ConfigError, Result, RuntimeError, RuntimeHandle};
pub use config::{RuntimeConfig, SpawnPoint};
pub use events::{Event, EventBus, SessionEvent, Topic, WorldEvent};
pub use hooks::EventForwardingHook;
pub use oracle::OracleManager;
pub use repository::{
    CharacterRepository, FileCharacterRepository, InMemoryCharacterRepo, RepositoryError,
    SavedCharacter,
};
pub use runtime::{Runtime, RuntimeBuilder};
