//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for embedding the authoritative world.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use realm_core::{HookRegistry, Position, WorldEngine, WorldHook, WorldState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::hooks::EventForwardingHook;
use crate::oracle::OracleManager;
use crate::repository::{CharacterRepository, FileCharacterRepository, InMemoryCharacterRepo};
use crate::workers::{Command, SimulationWorker};

/// Main runtime that hosts the authoritative simulation
///
/// Design: Runtime owns the worker and its shutdown signal.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    shutdown_tx: oneshot::Sender<()>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Build and start a runtime from configuration alone.
    pub async fn start(config: RuntimeConfig) -> Result<Self> {
        Self::builder().config(config).build().await
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stop the worker after it finishes the command in progress. Online
    /// players are saved as offline before this returns.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; joining reports why.
        let _ = self.shutdown_tx.send(());
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    world: Option<WorldState>,
    oracles: Option<OracleManager>,
    repository: Option<Arc<dyn CharacterRepository>>,
    hooks: Vec<Arc<dyn WorldHook>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            world: None,
            oracles: None,
            repository: None,
            hooks: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide an initial world instead of an empty one
    pub fn initial_world(mut self, world: WorldState) -> Self {
        self.world = Some(world);
        self
    }

    /// Use these oracles instead of loading content from the configured
    /// (or bundled) data directory
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Use this repository instead of the one implied by `save_dir`
    pub fn repository(mut self, repository: Arc<dyn CharacterRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Register an extra engine hook next to the PvP status and
    /// event-forwarding hooks.
    pub fn hook(mut self, hook: Arc<dyn WorldHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Build the runtime and start its worker
    pub async fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let oracles = match self.oracles {
            Some(oracles) => oracles,
            None => {
                let dir = self
                    .config
                    .content_dir
                    .clone()
                    .unwrap_or_else(realm_content::bundled_data_dir);
                OracleManager::load(&dir)?
            }
        };

        let repository: Arc<dyn CharacterRepository> = match self.repository {
            Some(repository) => repository,
            None => match &self.config.save_dir {
                Some(dir) => Arc::new(FileCharacterRepository::new(dir)?),
                None => Arc::new(InMemoryCharacterRepo::new()),
            },
        };

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let mut hooks = HookRegistry::with_defaults();
        for hook in self.hooks {
            hooks.register(hook);
        }
        hooks.register(Arc::new(EventForwardingHook::new(event_bus.clone())));

        let mut world = self.world.unwrap_or_default();
        {
            let env = oracles.as_game_env();
            let mut engine = WorldEngine::new(&mut world, &hooks);
            for point in &self.config.spawns {
                engine.spawn(&env, &point.template, Position::new(point.x, point.y), None)?;
            }
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            world,
            oracles,
            hooks,
            repository,
            command_rx,
            event_bus,
            self.config.tick_interval(),
            self.config.autosave_ticks,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run(shutdown_rx).await;
        });

        info!(
            target: "runtime::worker",
            tick_ms = self.config.tick_ms,
            spawns = self.config.spawns.len(),
            "runtime started"
        );

        Ok(Runtime {
            handle,
            shutdown_tx,
            sim_worker_handle,
        })
    }
}
