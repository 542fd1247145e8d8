//! Input buffered while the local actor is casting.

use realm_core::{Command, Motion, Position, Velocity};

/// Single-slot, last-write-wins input captured during a blocking state.
///
/// When the cast completes the slot is drained once: a destination or a
/// velocity becomes a movement command, a skill becomes a new skill intent.
/// Any of them pre-empts the finished skill's follow-up attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PendingAction {
    Destination(Position),
    Velocity(Velocity),
    Skill(usize),
}

impl PendingAction {
    /// The predicted motion and the command to send, for movement actions.
    pub fn movement(&self) -> Option<(Motion, Command)> {
        match *self {
            Self::Destination(destination) => {
                Some((Motion::Destination(destination), Command::Move { destination }))
            }
            Self::Velocity(velocity) => Some((Motion::Velocity(velocity), Command::Steer { velocity })),
            Self::Skill(_) => None,
        }
    }
}
