use std::fmt;

/// Stable identifier for any actor tracked in the world.
///
/// Ids are never reused within one running world. "No reference" is expressed
/// as `Option<ActorId>::None` or as an id that no longer resolves in the actor
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position on the walkable ground plane, in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Moves from `self` toward `to` by at most `step` units.
    pub fn step_toward(self, to: Position, step: f32) -> Position {
        let distance = self.distance(to);
        if distance <= step || distance <= f32::EPSILON {
            return to;
        }
        let t = step / distance;
        Position::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    pub fn offset(self, velocity: Velocity, seconds: f32) -> Position {
        Position::new(self.x + velocity.x * seconds, self.y + velocity.y * seconds)
    }
}

/// Velocity vector in world units per second.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.magnitude() <= f32::EPSILON
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Monotonic world time in milliseconds.
///
/// The world clock restarts with the process, so absolute values must never
/// be persisted. Convert to a remaining duration with [`WorldTime::remaining_until`]
/// and back with `now + remaining`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldTime(pub u64);

impl WorldTime {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Milliseconds left until `end`, zero if `end` already passed.
    pub fn remaining_until(self, end: WorldTime) -> u64 {
        end.0.saturating_sub(self.0)
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: WorldTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for WorldTime {
    type Output = WorldTime;
    fn add(self, rhs: u64) -> WorldTime {
        WorldTime(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for WorldTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_stops_at_destination() {
        let from = Position::new(0.0, 0.0);
        let to = Position::new(3.0, 4.0);

        assert_eq!(from.step_toward(to, 2.5), Position::new(1.5, 2.0));
        assert_eq!(from.step_toward(to, 10.0), to);
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let now = WorldTime(5_000);
        assert_eq!(now.remaining_until(WorldTime(7_500)), 2_500);
        assert_eq!(now.remaining_until(WorldTime(1_000)), 0);
    }
}
