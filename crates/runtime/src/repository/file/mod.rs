//! File-based CharacterRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use realm_core::CharacterRecord;
use tracing::debug;

use crate::repository::{CharacterRepository, RepositoryError, Result, SavedCharacter};

/// File-based implementation of CharacterRepository.
///
/// Each character is stored as `{name}.json` holding a [`SavedCharacter`].
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-save leaves the previous record intact.
pub struct FileCharacterRepository {
    base_dir: PathBuf,
}

impl FileCharacterRepository {
    /// Create a new file-based repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn character_path(&self, name: &str) -> Result<PathBuf> {
        // Names become file names; anything beyond plain alphanumerics could
        // escape the directory.
        if name.is_empty() || !name.chars().all(char::is_alphanumeric) {
            return Err(RepositoryError::InvalidName(name.to_string()));
        }
        Ok(self.base_dir.join(format!("{name}.json")))
    }

    fn read_entry(&self, name: &str) -> Result<Option<SavedCharacter>> {
        let path = self.character_path(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let saved: SavedCharacter = serde_json::from_slice(&bytes)?;
        if saved.record.name != name {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds character '{}'",
                path.display(),
                saved.record.name
            )));
        }
        Ok(Some(saved))
    }
}

impl CharacterRepository for FileCharacterRepository {
    fn load(&self, name: &str) -> Result<Option<CharacterRecord>> {
        let saved = self.read_entry(name)?;
        if saved.is_some() {
            debug!(target: "runtime::repository", character = name, "loaded character");
        }
        Ok(saved.map(|saved| saved.record))
    }

    fn save(&self, record: &CharacterRecord, online: bool) -> Result<()> {
        let path = self.character_path(&record.name)?;
        let temp_path = path.with_extension("json.tmp");

        let saved = SavedCharacter {
            online,
            record: record.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&saved)?;

        fs::write(&temp_path, bytes)?;
        // Atomic rename
        fs::rename(&temp_path, &path)?;

        debug!(
            target: "runtime::repository",
            character = %record.name,
            online,
            path = %path.display(),
            "saved character"
        );
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(name) = filename.strip_suffix(".json")
                && !name.is_empty()
            {
                names.push(name.to_string());
            }
        }

        names.sort_unstable();
        Ok(names)
    }

    fn is_online(&self, name: &str) -> Result<bool> {
        Ok(self.read_entry(name)?.is_some_and(|saved| saved.online))
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.character_path(name)?;
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(target: "runtime::repository", character = name, "deleted character");
        }
        Ok(())
    }
}
