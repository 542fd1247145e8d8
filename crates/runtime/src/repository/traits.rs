//! Repository contract for saving and loading player characters.

use realm_core::CharacterRecord;
use serde::{Deserialize, Serialize};

use super::Result;

/// A stored character plus the online flag written with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedCharacter {
    pub online: bool,
    pub record: CharacterRecord,
}

/// Persistence bridge for player characters, keyed by character name.
///
/// Records carry timers as remaining durations, so implementations store them
/// verbatim and never need the world clock.
pub trait CharacterRepository: Send + Sync {
    /// Load a character by name. `None` when it was never saved.
    fn load(&self, name: &str) -> Result<Option<CharacterRecord>>;

    /// Save a character, replacing any previous record of the same name.
    ///
    /// `online` is true for autosaves of a connected player and false for the
    /// final save at logout.
    fn save(&self, record: &CharacterRecord, online: bool) -> Result<()>;

    /// Names of all stored characters, sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Online flag of the last save; false for unknown characters.
    fn is_online(&self, name: &str) -> Result<bool>;

    /// Remove a character. Removing an unknown name is not an error.
    fn delete(&self, name: &str) -> Result<()>;
}
