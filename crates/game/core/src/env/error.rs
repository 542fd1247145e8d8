//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle is fatal for the operation that needed it; a missing
/// template is a bad reference inside otherwise valid data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("SkillOracle not available")]
    SkillsNotAvailable,

    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    #[error("ActorOracle not available")]
    ActorsNotAvailable,

    #[error("ConfigOracle not available")]
    ConfigNotAvailable,

    #[error("MovementAgent not available")]
    MovementNotAvailable,

    #[error("skill definition '{0}' not found")]
    SkillNotFound(String),

    #[error("buff definition '{0}' not found")]
    BuffNotFound(String),

    #[error("item definition '{0}' not found")]
    ItemNotFound(String),

    #[error("actor template '{0}' not found")]
    ActorTemplateNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            SkillsNotAvailable | ItemsNotAvailable | ActorsNotAvailable | ConfigNotAvailable
            | MovementNotAvailable => ErrorSeverity::Fatal,

            SkillNotFound(_) | BuffNotFound(_) | ItemNotFound(_) | ActorTemplateNotFound(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            SkillsNotAvailable => "ORACLE_SKILLS_NOT_AVAILABLE",
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            ActorsNotAvailable => "ORACLE_ACTORS_NOT_AVAILABLE",
            ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            MovementNotAvailable => "ORACLE_MOVEMENT_NOT_AVAILABLE",
            SkillNotFound(_) => "ORACLE_SKILL_NOT_FOUND",
            BuffNotFound(_) => "ORACLE_BUFF_NOT_FOUND",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            ActorTemplateNotFound(_) => "ORACLE_ACTOR_TEMPLATE_NOT_FOUND",
        }
    }
}
