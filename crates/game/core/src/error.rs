//! Common error infrastructure for realm-core.
//!
//! Domain errors (`CastError`, `CommandRejection`, `OracleError`,
//! `RestoreWarning`) live next to the code that produces them and share the
//! classification defined here. Severity picks the log level of a rejection.
//!
//! Nothing in this crate is fatal to the process: the worst outcome of a
//! single actor's error is that actor being forced back to a safe state.

/// Severity level of an error, used for categorization and log levels.
///
/// - **Recoverable**: the same request may succeed later (cooldown, range)
/// - **Validation**: the request is invalid for the current state
/// - **Internal**: a state inconsistency that should be investigated
/// - **Fatal**: a required collaborator is missing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: skill on cooldown, target out of range, not enough mana.
    Recoverable,

    /// Examples: command not allowed while dead, slot index out of bounds.
    Validation,

    /// Examples: actor missing from the table mid-tick, unknown template.
    Internal,

    /// Examples: missing required oracle.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug rather than a bad request.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all realm-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity by recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
