use crate::env::{ItemCategory, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{ActorId, BehaviorState};

/// Why the gate dropped a command. Never sent back to the client.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CommandRejection {
    #[error("subject {0} not found")]
    SubjectNotFound(ActorId),

    #[error("{sender} does not control {subject}")]
    NotAuthorized { sender: ActorId, subject: ActorId },

    #[error("'{0}' cannot be issued to a companion")]
    NotACompanionCommand(&'static str),

    #[error("'{command}' not allowed while {state}")]
    StateNotAllowed {
        command: &'static str,
        state: BehaviorState,
    },

    #[error("only players can do this")]
    NotAPlayer,

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("slot {0} is empty")]
    SlotEmpty(usize),

    #[error("slot operation would not change anything")]
    NoEffect,

    #[error("invalid destination or velocity")]
    InvalidMotion,

    #[error("destination {distance:.1} units away exceeds {limit:.1}")]
    DestinationTooFar { distance: f32, limit: f32 },

    #[error("target {0} not found")]
    TargetNotFound(ActorId),

    #[error("skill '{0}' is at its maximum level")]
    SkillMaxed(String),

    #[error("no skill points left")]
    NoSkillPoints,

    #[error("skill '{0}' is not learned")]
    SkillNotLearned(String),

    #[error("item category {found} does not fit slot for {expected}")]
    CategoryMismatch {
        expected: ItemCategory,
        found: ItemCategory,
    },

    #[error("requires level {required}")]
    LevelTooLow { required: u32 },

    #[error("item '{0}' cannot be destroyed")]
    NotDestroyable(String),

    #[error("item '{0}' cannot be sold")]
    NotSellable(String),

    #[error("item '{0}' has no use")]
    NotUsable(String),

    #[error("no lootable corpse targeted")]
    NoLootTarget,

    #[error("no living mount to ride")]
    NoMount,

    #[error("no merchant targeted")]
    NoMerchantTarget,

    #[error("target is out of interaction range")]
    OutOfInteractionRange,

    #[error("nothing to loot")]
    NothingToLoot,

    #[error("inventory full")]
    InventoryFull,

    #[error("invalid amount {0}")]
    InvalidAmount(u16),

    #[error("not enough gold: need {required}, have {available}")]
    NotEnoughGold { required: u64, available: u64 },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CommandRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughGold { .. } | Self::InventoryFull | Self::OutOfInteractionRange => {
                ErrorSeverity::Recoverable
            }
            Self::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SubjectNotFound(_) => "COMMAND_SUBJECT_NOT_FOUND",
            Self::NotAuthorized { .. } => "COMMAND_NOT_AUTHORIZED",
            Self::NotACompanionCommand(_) => "COMMAND_NOT_A_COMPANION_COMMAND",
            Self::StateNotAllowed { .. } => "COMMAND_STATE_NOT_ALLOWED",
            Self::NotAPlayer => "COMMAND_NOT_A_PLAYER",
            Self::IndexOutOfBounds { .. } => "COMMAND_INDEX_OUT_OF_BOUNDS",
            Self::SlotEmpty(_) => "COMMAND_SLOT_EMPTY",
            Self::NoEffect => "COMMAND_NO_EFFECT",
            Self::InvalidMotion => "COMMAND_INVALID_MOTION",
            Self::DestinationTooFar { .. } => "COMMAND_DESTINATION_TOO_FAR",
            Self::TargetNotFound(_) => "COMMAND_TARGET_NOT_FOUND",
            Self::SkillMaxed(_) => "COMMAND_SKILL_MAXED",
            Self::NoSkillPoints => "COMMAND_NO_SKILL_POINTS",
            Self::SkillNotLearned(_) => "COMMAND_SKILL_NOT_LEARNED",
            Self::CategoryMismatch { .. } => "COMMAND_CATEGORY_MISMATCH",
            Self::LevelTooLow { .. } => "COMMAND_LEVEL_TOO_LOW",
            Self::NotDestroyable(_) => "COMMAND_NOT_DESTROYABLE",
            Self::NotSellable(_) => "COMMAND_NOT_SELLABLE",
            Self::NotUsable(_) => "COMMAND_NOT_USABLE",
            Self::NoLootTarget => "COMMAND_NO_LOOT_TARGET",
            Self::NoMount => "COMMAND_NO_MOUNT",
            Self::NoMerchantTarget => "COMMAND_NO_MERCHANT_TARGET",
            Self::OutOfInteractionRange => "COMMAND_OUT_OF_INTERACTION_RANGE",
            Self::NothingToLoot => "COMMAND_NOTHING_TO_LOOT",
            Self::InventoryFull => "COMMAND_INVENTORY_FULL",
            Self::InvalidAmount(_) => "COMMAND_INVALID_AMOUNT",
            Self::NotEnoughGold { .. } => "COMMAND_NOT_ENOUGH_GOLD",
            Self::Oracle(err) => err.error_code(),
        }
    }
}
