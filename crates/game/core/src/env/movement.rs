//! Movement collaborator.
//!
//! The navigation mesh is external. The engine only asks an agent to advance a
//! [`Motion`] by the elapsed time and observes whether the actor still moves.

use crate::state::{Motion, Position};

/// Interface for the navigation/movement subsystem.
pub trait MovementAgent: Send + Sync {
    /// Advances `motion` starting at `from` for `elapsed_ms` at `speed` units
    /// per second. Returns the new position and the remaining motion, which is
    /// [`Motion::Idle`] once a destination is reached.
    fn advance(&self, from: Position, motion: Motion, speed: f32, elapsed_ms: u64)
    -> (Position, Motion);
}

/// Reference agent moving in straight lines over an obstacle-free plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightLineAgent;

impl MovementAgent for StraightLineAgent {
    fn advance(
        &self,
        from: Position,
        motion: Motion,
        speed: f32,
        elapsed_ms: u64,
    ) -> (Position, Motion) {
        let seconds = elapsed_ms as f32 / 1000.0;
        match motion {
            Motion::Idle => (from, Motion::Idle),
            Motion::Destination(to) => {
                let next = from.step_toward(to, speed * seconds);
                if next == to {
                    (next, Motion::Idle)
                } else {
                    (next, motion)
                }
            }
            Motion::Velocity(velocity) => (from.offset(velocity, seconds), motion),
        }
    }
}
