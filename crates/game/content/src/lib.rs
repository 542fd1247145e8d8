//! Data-driven content definitions and loaders.
//!
//! This crate reads the static game content from RON/TOML data files:
//! - Skill and buff templates (RON)
//! - Item catalog (RON)
//! - Actor templates for player classes, monsters, merchants and companions (RON)
//! - World rules (TOML)
//!
//! Content is consumed through the core oracles and never appears in world
//! state. The shipped data lives in this crate's `data/` directory.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActorLoader, BuffLoader, ConfigLoader, ContentFactory, ItemLoader, LoadResult, SkillLoader,
};

/// Directory holding the data files shipped with this crate.
pub fn bundled_data_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
