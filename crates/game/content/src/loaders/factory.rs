//! Content factory for building the content snapshot from data files.

use std::path::{Path, PathBuf};

use realm_core::env::BuffDefinition;
use realm_core::{ActorTemplate, ContentSnapshot, ItemDefinition, SkillDefinition, WorldRules};
use tracing::info;

use crate::loaders::{
    ActorLoader, BuffLoader, ConfigLoader, ItemLoader, LoadResult, SkillLoader,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// ├── skills.ron
/// ├── buffs.ron
/// ├── items.ron
/// └── actors.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::bundled_data_dir())
    }

    /// Load world rules from `rules.toml`. A missing file yields the defaults.
    pub fn load_rules(&self) -> LoadResult<WorldRules> {
        let path = self.data_dir.join("rules.toml");
        if !path.exists() {
            return Ok(WorldRules::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load skill templates from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load buff templates from `buffs.ron`.
    pub fn load_buffs(&self) -> LoadResult<Vec<BuffDefinition>> {
        BuffLoader::load(&self.data_dir.join("buffs.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load actor templates from `actors.ron`.
    pub fn load_actors(&self) -> LoadResult<Vec<ActorTemplate>> {
        ActorLoader::load(&self.data_dir.join("actors.ron"))
    }

    /// Loads every file and checks that all cross references resolve.
    pub fn load_all(&self) -> LoadResult<ContentSnapshot> {
        let snapshot = ContentSnapshot::new(
            self.load_skills()?,
            self.load_buffs()?,
            self.load_items()?,
            self.load_actors()?,
            self.load_rules()?,
        );

        let missing = snapshot.dangling_references();
        if !missing.is_empty() {
            anyhow::bail!(
                "Content in {} has unresolved references: {}",
                self.data_dir.display(),
                missing.join(", ")
            );
        }

        info!(
            target: "realm::content",
            dir = %self.data_dir.display(),
            skills = snapshot.skills.len(),
            buffs = snapshot.buffs.len(),
            items = snapshot.items.len(),
            templates = snapshot.templates.len(),
            "content loaded"
        );
        Ok(snapshot)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
