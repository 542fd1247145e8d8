//! Runtime wrapper around the static game content oracles.
//!
//! The content is immutable at runtime and shared behind an [`Arc`]; the
//! [`OracleManager`] builds a [`GameEnv`] view over it on demand. Dynamic
//! state lives in the world and in repositories.

use std::path::Path;
use std::sync::Arc;

use realm_content::ContentFactory;
use realm_core::{ContentSnapshot, GameEnv, MovementAgent, StraightLineAgent, WorldRules};

use crate::api::{Result, RuntimeError};

/// Manages the content snapshot and movement agent and provides unified access.
#[derive(Clone)]
pub struct OracleManager {
    content: Arc<ContentSnapshot>,
    movement: Arc<dyn MovementAgent>,
}

impl OracleManager {
    /// Creates a manager over `content` with the straight-line movement agent.
    pub fn new(content: ContentSnapshot) -> Self {
        Self::with_movement(content, Arc::new(StraightLineAgent))
    }

    /// Creates a manager with a custom movement agent, such as a navmesh.
    pub fn with_movement(content: ContentSnapshot, movement: Arc<dyn MovementAgent>) -> Self {
        Self {
            content: Arc::new(content),
            movement,
        }
    }

    /// Loads and validates every content file under `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let content = ContentFactory::new(data_dir)
            .load_all()
            .map_err(|source| RuntimeError::Content {
                dir: data_dir.to_path_buf(),
                message: format!("{source:#}"),
            })?;
        Ok(Self::new(content))
    }

    /// Converts oracle manager into GameEnv for realm-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        let content: &ContentSnapshot = &self.content;
        GameEnv::with_all(content, content, content, content, self.movement.as_ref())
    }

    pub fn content(&self) -> &ContentSnapshot {
        &self.content
    }

    pub fn rules(&self) -> &WorldRules {
        &self.content.rules
    }
}

impl std::fmt::Debug for OracleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleManager")
            .field("skills", &self.content.skills.len())
            .field("items", &self.content.items.len())
            .field("templates", &self.content.templates.len())
            .finish_non_exhaustive()
    }
}
