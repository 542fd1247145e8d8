//! Content loaders for reading game data from files.
//!
//! Each loader parses one file into core definition types; [`ContentFactory`]
//! assembles them into a validated [`realm_core::ContentSnapshot`].

pub mod actors;
pub mod config;
pub mod factory;
pub mod item;
pub mod skills;

pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use skills::{BuffLoader, SkillLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Errors when two definitions in one catalog share a name.
pub(crate) fn ensure_unique<'a>(
    kind: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> LoadResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            anyhow::bail!("Duplicate {} definition '{}'", kind, name);
        }
    }
    Ok(())
}
