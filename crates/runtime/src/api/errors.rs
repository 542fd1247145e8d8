//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, configuration, content loading
//! and repositories so clients can bubble them up with consistent context.
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

use realm_core::SpawnError;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load content from {dir}: {message}")]
    Content { dir: PathBuf, message: String },

    #[error("failed to spawn actor: {0}")]
    Spawn(#[from] SpawnError),

    #[error("player '{0}' is not online")]
    NotOnline(String),
}

/// Errors raised while assembling a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment variable {key}={value:?} is not a valid value")]
    InvalidEnv { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
