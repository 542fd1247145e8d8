//! Simulation worker that owns the authoritative [`realm_core::WorldState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives
//! [`realm_core::WorldEngine`] on a fixed interval, persists characters and
//! publishes events to the EventBus.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use realm_core::{
    ActorId, CharacterRecord, HookRegistry, Position, Request, SpawnError, WorldEngine,
    WorldSnapshot, WorldState, WorldTime,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, SessionEvent, Topic};
use crate::oracle::OracleManager;
use crate::repository::CharacterRepository;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Pass a request through the command gate. Fire-and-forget.
    Submit { request: Request },
    /// Bring a player into the world, restoring a saved character when one exists.
    Login {
        name: String,
        template: String,
        reply: oneshot::Sender<Result<ActorId>>,
    },
    /// Save a player and remove it (and its companions) from the world.
    Logout {
        name: String,
        reply: oneshot::Sender<Result<CharacterRecord>>,
    },
    /// Spawn a monster, NPC or companion from a template.
    Spawn {
        template: String,
        position: Position,
        owner: Option<ActorId>,
        reply: oneshot::Sender<Result<ActorId>>,
    },
    /// Capture the current world (read-only).
    Snapshot {
        reply: oneshot::Sender<WorldSnapshot>,
    },
    /// Save every online player now. Replies with the number saved.
    SaveAll { reply: oneshot::Sender<Result<usize>> },
}

/// Background task that advances the world and processes commands.
///
/// Commands only set intents on actors; every state transition happens in
/// the tick, so a command is never applied half-way.
pub struct SimulationWorker {
    world: WorldState,
    oracles: OracleManager,
    hooks: HookRegistry,
    repository: Arc<dyn CharacterRepository>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_interval: Duration,
    autosave_ticks: u64,
    ticks: u64,
}

impl SimulationWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        world: WorldState,
        oracles: OracleManager,
        hooks: HookRegistry,
        repository: Arc<dyn CharacterRepository>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_interval: Duration,
        autosave_ticks: u64,
    ) -> Self {
        info!(
            target: "runtime::worker",
            actors = world.len(),
            hooks = ?hooks,
            tick_ms = tick_interval.as_millis() as u64,
            autosave_ticks,
            "SimulationWorker initialized"
        );

        Self {
            world,
            oracles,
            hooks,
            repository,
            command_rx,
            event_bus,
            tick_interval,
            autosave_ticks,
            ticks: 0,
        }
    }

    /// Main worker loop. Ends on `shutdown` or when every handle is dropped,
    /// saving online players as offline on the way out.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let started = Instant::now();
        let base = self.world.time();
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    self.tick(base + elapsed);
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
            }
        }

        let saved = self.save_online(false);
        info!(
            target: "runtime::worker",
            ticks = self.ticks,
            saved,
            "SimulationWorker stopped"
        );
    }

    fn tick(&mut self, now: WorldTime) {
        let env = self.oracles.as_game_env();
        let report = WorldEngine::new(&mut self.world, &self.hooks).tick(&env, now);
        self.ticks += 1;

        trace!(
            target: "runtime::worker",
            tick = self.ticks,
            time = %report.time,
            transitions = report.transitions.len(),
            "tick complete"
        );

        if self.event_bus.has_subscribers(Topic::Snapshot) {
            let snapshot = WorldSnapshot::capture(&self.world, &env);
            self.event_bus.publish(Event::Snapshot(Arc::new(snapshot)));
        }

        if self.autosave_ticks > 0 && self.ticks % self.autosave_ticks == 0 {
            self.save_online(true);
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit { request } => {
                let env = self.oracles.as_game_env();
                WorldEngine::new(&mut self.world, &self.hooks).submit(&env, &request);
            }
            Command::Login {
                name,
                template,
                reply,
            } => {
                let result = self.login(&name, &template);
                if reply.send(result).is_err() {
                    debug!("Login reply channel closed (caller dropped)");
                }
            }
            Command::Logout { name, reply } => {
                let result = self.logout(&name);
                if reply.send(result).is_err() {
                    debug!("Logout reply channel closed (caller dropped)");
                }
            }
            Command::Spawn {
                template,
                position,
                owner,
                reply,
            } => {
                let env = self.oracles.as_game_env();
                let result = WorldEngine::new(&mut self.world, &self.hooks)
                    .spawn(&env, &template, position, owner)
                    .map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("Spawn reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { reply } => {
                let env = self.oracles.as_game_env();
                if reply.send(WorldSnapshot::capture(&self.world, &env)).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::SaveAll { reply } => {
                let saved = self.save_online(true);
                if reply.send(Ok(saved)).is_err() {
                    debug!("SaveAll reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn login(&mut self, name: &str, template: &str) -> Result<ActorId> {
        if self.world.player_id(name).is_some() {
            return Err(SpawnError::AlreadyOnline(name.to_string()).into());
        }
        let env = self.oracles.as_game_env();

        let (id, restored) = match self.repository.load(name)? {
            Some(record) => {
                let (actor, warnings) = record.restore(&mut self.world, &env)?;
                if !warnings.is_empty() {
                    warn!(
                        target: "runtime::worker",
                        character = name,
                        warnings = warnings.len(),
                        "character restored with skipped references"
                    );
                }
                let id = WorldEngine::new(&mut self.world, &self.hooks).insert(&env, actor);
                (id, true)
            }
            None => {
                let spawn_point = self.oracles.rules().revival_point;
                let id = WorldEngine::new(&mut self.world, &self.hooks)
                    .spawn_player(&env, template, name, spawn_point)?;
                (id, false)
            }
        };

        // Mark the character online right away; a crash before the first
        // autosave still leaves a record behind.
        if let Some(record) = self
            .world
            .actor(id)
            .and_then(|actor| CharacterRecord::capture(actor, self.world.time()))
            && let Err(err) = self.repository.save(&record, true)
        {
            self.report_save_failure(name, &err.to_string());
        }

        info!(target: "runtime::worker", player = name, actor = %id, restored, "player logged in");
        self.event_bus.publish(Event::Session(SessionEvent::LoggedIn {
            name: name.to_string(),
            actor: id,
            restored,
        }));
        Ok(id)
    }

    fn logout(&mut self, name: &str) -> Result<CharacterRecord> {
        let id = self
            .world
            .player_id(name)
            .ok_or_else(|| RuntimeError::NotOnline(name.to_string()))?;
        let record = self
            .world
            .actor(id)
            .and_then(|actor| CharacterRecord::capture(actor, self.world.time()))
            .ok_or_else(|| RuntimeError::NotOnline(name.to_string()))?;

        // A failed save keeps the player online so nothing is lost.
        self.repository.save(&record, false)?;

        let env = self.oracles.as_game_env();
        WorldEngine::new(&mut self.world, &self.hooks).despawn(&env, id);

        info!(target: "runtime::worker", player = name, actor = %id, "player logged out");
        self.event_bus.publish(Event::Session(SessionEvent::LoggedOut {
            name: name.to_string(),
            actor: id,
        }));
        Ok(record)
    }

    /// Saves every player in the world. Failures are logged and reported on
    /// the session topic; the remaining players are still saved.
    fn save_online(&mut self, online: bool) -> usize {
        let now = self.world.time();
        let records: Vec<CharacterRecord> = self
            .world
            .players()
            .filter_map(|actor| CharacterRecord::capture(actor, now))
            .collect();
        if records.is_empty() {
            return 0;
        }

        let mut names = Vec::with_capacity(records.len());
        for record in &records {
            match self.repository.save(record, online) {
                Ok(()) => names.push(record.name.clone()),
                Err(err) => self.report_save_failure(&record.name, &err.to_string()),
            }
        }

        debug!(target: "runtime::worker", saved = names.len(), online, "characters saved");
        let saved = names.len();
        self.event_bus
            .publish(Event::Session(SessionEvent::Saved { names, online }));
        saved
    }

    fn report_save_failure(&self, name: &str, message: &str) {
        warn!(target: "runtime::worker", character = name, error = message, "failed to save character");
        self.event_bus.publish(Event::Session(SessionEvent::SaveFailed {
            name: name.to_string(),
            message: message.to_string(),
        }));
    }
}
