//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `REALM_*` environment variables. Every layer may omit any key.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::ConfigError;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Milliseconds of world time per simulation tick.
    pub tick_ms: u64,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Ticks between autosaves of online players; 0 disables autosave.
    pub autosave_ticks: u64,
    /// Character save directory. `None` keeps characters in memory.
    pub save_dir: Option<PathBuf>,
    /// Content data directory. `None` uses the bundled content.
    pub content_dir: Option<PathBuf>,
    /// Log file directory for the server binary. `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    /// Actors placed in the world when the runtime starts.
    pub spawns: Vec<SpawnPoint>,
}

/// A monster or NPC placed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub template: String,
    pub x: f32,
    pub y: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            command_buffer_size: 256,
            event_buffer_size: 1024,
            autosave_ticks: 600,
            save_dir: None,
            content_dir: None,
            log_dir: None,
            spawns: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_MS: u64 = 50;

    pub const ENV_TICK_MS: &'static str = "REALM_TICK_MS";
    pub const ENV_SAVE_DIR: &'static str = "REALM_SAVE_DIR";
    pub const ENV_CONTENT_DIR: &'static str = "REALM_CONTENT_DIR";
    pub const ENV_AUTOSAVE_TICKS: &'static str = "REALM_AUTOSAVE_TICKS";
    pub const ENV_COMMAND_BUFFER: &'static str = "REALM_COMMAND_BUFFER";
    pub const ENV_LOG_DIR: &'static str = "REALM_LOG_DIR";

    /// Defaults, overlaid with `path` when given, overlaid with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `REALM_*` overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(Self::ENV_TICK_MS) {
            self.tick_ms = parse(Self::ENV_TICK_MS, value)?;
        }
        if let Some(value) = lookup(Self::ENV_AUTOSAVE_TICKS) {
            self.autosave_ticks = parse(Self::ENV_AUTOSAVE_TICKS, value)?;
        }
        if let Some(value) = lookup(Self::ENV_COMMAND_BUFFER) {
            self.command_buffer_size = parse(Self::ENV_COMMAND_BUFFER, value)?;
        }
        if let Some(value) = lookup(Self::ENV_SAVE_DIR) {
            self.save_dir = non_empty_path(value);
        }
        if let Some(value) = lookup(Self::ENV_CONTENT_DIR) {
            self.content_dir = non_empty_path(value);
        }
        if let Some(value) = lookup(Self::ENV_LOG_DIR) {
            self.log_dir = non_empty_path(value);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Zero("tick_ms"));
        }
        if self.command_buffer_size == 0 {
            return Err(ConfigError::Zero("command_buffer_size"));
        }
        if self.event_buffer_size == 0 {
            return Err(ConfigError::Zero("event_buffer_size"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Platform data directory for saved characters when none is configured.
    ///
    /// - Linux: `~/.local/share/realm/characters`
    /// - macOS: `~/Library/Application Support/realm/characters`
    /// - Fallback: `./save_data/characters`
    pub fn default_save_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "realm")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./save_data"))
            .join("characters")
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

fn non_empty_path(value: String) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.toml");
        std::fs::write(
            &path,
            r#"
tick_ms = 100
save_dir = "/srv/realm"

[[spawns]]
template = "Goblin"
x = 12.0
y = -3.5
"#,
        )
        .unwrap();

        let config = RuntimeConfig::from_file(&path).unwrap();

        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.save_dir, Some(PathBuf::from("/srv/realm")));
        assert_eq!(config.command_buffer_size, RuntimeConfig::default().command_buffer_size);
        assert_eq!(
            config.spawns,
            vec![SpawnPoint {
                template: "Goblin".into(),
                x: 12.0,
                y: -3.5
            }]
        );
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = [
            (RuntimeConfig::ENV_TICK_MS, "20"),
            (RuntimeConfig::ENV_AUTOSAVE_TICKS, "0"),
            (RuntimeConfig::ENV_CONTENT_DIR, " "),
        ]
        .into_iter()
        .collect();
        let mut config = RuntimeConfig {
            content_dir: Some(PathBuf::from("data")),
            ..RuntimeConfig::default()
        };

        config
            .apply_env(|key| env.get(key).map(|value| value.to_string()))
            .unwrap();

        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.autosave_ticks, 0);
        assert_eq!(config.content_dir, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = RuntimeConfig::default();
        let err = config
            .apply_env(|key| (key == RuntimeConfig::ENV_TICK_MS).then(|| "fast".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "REALM_TICK_MS", .. }));

        config.tick_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Zero("tick_ms"))));
    }
}
