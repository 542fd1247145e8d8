//! In-memory CharacterRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use realm_core::CharacterRecord;

use crate::repository::{CharacterRepository, RepositoryError, Result, SavedCharacter};

/// In-memory implementation of CharacterRepository.
///
/// Characters are lost when the process exits.
#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<BTreeMap<String, SavedCharacter>>,
}

impl InMemoryCharacterRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full stored entry, including the online flag.
    pub fn entry(&self, name: &str) -> Result<Option<SavedCharacter>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(name).cloned())
    }
}

impl CharacterRepository for InMemoryCharacterRepo {
    fn load(&self, name: &str) -> Result<Option<CharacterRecord>> {
        Ok(self.entry(name)?.map(|saved| saved.record))
    }

    fn save(&self, record: &CharacterRecord, online: bool) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(
            record.name.clone(),
            SavedCharacter {
                online,
                record: record.clone(),
            },
        );
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.keys().cloned().collect())
    }

    fn is_online(&self, name: &str) -> Result<bool> {
        Ok(self.entry(name)?.is_some_and(|saved| saved.online))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.remove(name);
        Ok(())
    }
}
