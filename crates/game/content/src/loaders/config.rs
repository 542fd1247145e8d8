//! World rules loader.

use std::path::Path;

use realm_core::WorldRules;

use crate::loaders::{LoadResult, read_file};

/// Loader for world rules from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load world rules from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<WorldRules> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<WorldRules> {
        let rules: WorldRules = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))?;

        if !(0.0..=1.0).contains(&rules.respawn_health_fraction) {
            anyhow::bail!(
                "respawn_health_fraction must be within 0..=1, got {}",
                rules.respawn_health_fraction
            );
        }
        if rules.offender_buff == rules.murderer_buff {
            anyhow::bail!("offender_buff and murderer_buff must differ");
        }
        Ok(rules)
    }
}
