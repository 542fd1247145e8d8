//! Actor template loader.

use std::path::Path;

use realm_core::ActorTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Actor catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorCatalog {
    pub actors: Vec<ActorTemplate>,
}

/// Loader for actor templates (player classes, monsters, NPCs, companions).
pub struct ActorLoader;

impl ActorLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ActorTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ActorTemplate>> {
        let catalog: ActorCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        ensure_unique("actor", catalog.actors.iter().map(|a| a.name.as_str()))?;
        for template in &catalog.actors {
            if template.base.health_max == 0 {
                anyhow::bail!("Actor '{}' has health_max 0", template.name);
            }
            if !template.base.speed.is_finite() || template.base.speed < 0.0 {
                anyhow::bail!("Actor '{}' has invalid speed {}", template.name, template.base.speed);
            }
        }
        Ok(catalog.actors)
    }
}
