//! Closed set of behavioral states an actor can be in.

/// Authoritative behavioral state of an actor.
///
/// `Trading` and `Crafting` are reserved placeholders: the state machine holds
/// them unchanged (only death pre-empts) and no command is accepted in them.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorState {
    #[default]
    Idle,
    Moving,
    Casting,
    Stunned,
    Dead,
    Trading,
    Crafting,
}

impl BehaviorState {
    /// States in which the actor may issue ordinary gameplay commands.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Idle | Self::Moving | Self::Casting)
    }

    /// States in which local input must be queued instead of applied.
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Casting)
    }
}
