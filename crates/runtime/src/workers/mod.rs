//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of the world; everything else
//! talks to it through commands and events.

mod simulation;

pub use simulation::{Command, SimulationWorker};
