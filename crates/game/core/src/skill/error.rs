use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, Position};

/// Reasons a cast attempt fails one of the self, target or distance checks.
///
/// A failed attempt never charges any cost.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CastError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("skill index {index} out of range (actor knows {len} skills)")]
    SkillIndexOutOfRange { index: usize, len: usize },

    #[error("skill '{0}' is not learned")]
    NotLearned(String),

    #[error("caster is dead")]
    CasterDead,

    #[error("not enough mana: need {required}, have {available}")]
    NotEnoughMana { required: u32, available: u32 },

    #[error("not enough {item}: need {required}, have {available}")]
    NotEnoughAmmo {
        item: String,
        required: u16,
        available: u32,
    },

    #[error("skill on cooldown for {remaining_ms}ms")]
    OnCooldown { remaining_ms: u64 },

    #[error("skill requires a target")]
    NoTarget,

    #[error("target {0} not found")]
    TargetNotFound(ActorId),

    #[error("target {0} is dead")]
    TargetDead(ActorId),

    #[error("cannot target self")]
    TargetIsSelf,

    #[error("target {0} cannot be attacked")]
    TargetNotAttackable(ActorId),

    #[error("target out of range ({distance:.2} > {range:.2})")]
    OutOfRange {
        distance: f32,
        range: f32,
        approach: Position,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughMana { .. }
            | Self::NotEnoughAmmo { .. }
            | Self::OnCooldown { .. }
            | Self::OutOfRange { .. } => ErrorSeverity::Recoverable,

            Self::SkillIndexOutOfRange { .. }
            | Self::NotLearned(_)
            | Self::CasterDead
            | Self::NoTarget
            | Self::TargetNotFound(_)
            | Self::TargetDead(_)
            | Self::TargetIsSelf
            | Self::TargetNotAttackable(_) => ErrorSeverity::Validation,

            Self::ActorNotFound(_) => ErrorSeverity::Internal,
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "CAST_ACTOR_NOT_FOUND",
            Self::SkillIndexOutOfRange { .. } => "CAST_SKILL_INDEX_OUT_OF_RANGE",
            Self::NotLearned(_) => "CAST_NOT_LEARNED",
            Self::CasterDead => "CAST_CASTER_DEAD",
            Self::NotEnoughMana { .. } => "CAST_NOT_ENOUGH_MANA",
            Self::NotEnoughAmmo { .. } => "CAST_NOT_ENOUGH_AMMO",
            Self::OnCooldown { .. } => "CAST_ON_COOLDOWN",
            Self::NoTarget => "CAST_NO_TARGET",
            Self::TargetNotFound(_) => "CAST_TARGET_NOT_FOUND",
            Self::TargetDead(_) => "CAST_TARGET_DEAD",
            Self::TargetIsSelf => "CAST_TARGET_IS_SELF",
            Self::TargetNotAttackable(_) => "CAST_TARGET_NOT_ATTACKABLE",
            Self::OutOfRange { .. } => "CAST_OUT_OF_RANGE",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
