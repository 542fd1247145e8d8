//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! sessions, commands, snapshots, and streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use realm_core::{ActorId, CharacterRecord, Command as GameCommand, Position, Request, WorldSnapshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(build(reply_tx)).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queue a request for the command gate.
    ///
    /// Fire-and-forget: the call succeeds once the request is queued. A
    /// request the gate rejects changes nothing; observe the outcome in the
    /// next snapshot. Requests from one handle are processed in order.
    pub async fn submit(&self, request: Request) -> Result<()> {
        self.send(Command::Submit { request }).await
    }

    /// Shorthand for a request where the sender acts on itself.
    pub async fn command(&self, sender: ActorId, command: GameCommand) -> Result<()> {
        self.submit(Request::own(sender, command)).await
    }

    /// Log a player in. Restores the saved character named `name` if one
    /// exists, otherwise creates a new one from the `template` class.
    pub async fn login(&self, name: impl Into<String>, template: impl Into<String>) -> Result<ActorId> {
        let name = name.into();
        let template = template.into();
        self.request(|reply| Command::Login {
            name,
            template,
            reply,
        })
        .await?
    }

    /// Save the player and remove it from the world. Returns the saved record.
    pub async fn logout(&self, name: impl Into<String>) -> Result<CharacterRecord> {
        let name = name.into();
        self.request(|reply| Command::Logout { name, reply }).await?
    }

    /// Spawn a monster, NPC, or (with `owner`) a companion.
    pub async fn spawn(
        &self,
        template: impl Into<String>,
        position: Position,
        owner: Option<ActorId>,
    ) -> Result<ActorId> {
        let template = template.into();
        self.request(|reply| Command::Spawn {
            template,
            position,
            owner,
            reply,
        })
        .await?
    }

    /// Query the current world (read-only snapshot)
    pub async fn snapshot(&self) -> Result<WorldSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Save every online player now. Returns how many were saved.
    pub async fn save_all(&self) -> Result<usize> {
        self.request(|reply| Command::SaveAll { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::World` - Spawns, damage, deaths and state transitions
    /// - `Topic::Snapshot` - One world snapshot per tick
    /// - `Topic::Session` - Logins, logouts and saves
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use realm_runtime::Topic;
    ///
    /// let mut snapshots = handle.subscribe(Topic::Snapshot);
    /// while let Ok(event) = snapshots.recv().await {
    ///     // Replicate to clients
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
