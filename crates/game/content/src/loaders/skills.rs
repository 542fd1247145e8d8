//! Skill and buff catalog loaders.

use std::path::Path;

use realm_core::env::BuffDefinition;
use realm_core::SkillDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

/// Buff catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffCatalog {
    pub buffs: Vec<BuffDefinition>,
}

/// Loader for skill templates from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load the skill catalog from a RON file.
    ///
    /// A skill with `max_level` 0 could never be learned and is rejected.
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        ensure_unique("skill", catalog.skills.iter().map(|s| s.name.as_str()))?;
        if let Some(skill) = catalog.skills.iter().find(|s| s.max_level == 0) {
            anyhow::bail!("Skill '{}' has max_level 0", skill.name);
        }
        Ok(catalog.skills)
    }
}

/// Loader for buff templates from RON files.
pub struct BuffLoader;

impl BuffLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<BuffDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<BuffDefinition>> {
        let catalog: BuffCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse buff catalog RON: {}", e))?;

        ensure_unique("buff", catalog.buffs.iter().map(|b| b.name.as_str()))?;
        Ok(catalog.buffs)
    }
}
