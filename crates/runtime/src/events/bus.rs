//! Topic-based event bus implementation.

use std::sync::Arc;

use realm_core::WorldSnapshot;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{SessionEvent, WorldEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Actor lifecycle, damage and state transitions
    World,
    /// One world snapshot per tick
    Snapshot,
    /// Logins, logouts and saves
    Session,
}

/// Event wrapper that carries the typed payload
#[derive(Debug, Clone)]
pub enum Event {
    World(WorldEvent),
    Snapshot(Arc<WorldSnapshot>),
    Session(SessionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::World(_) => Topic::World,
            Event::Snapshot(_) => Topic::Snapshot,
            Event::Session(_) => Topic::Session,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Delivery is best-effort: slow subscribers observe
/// `RecvError::Lagged` and skip ahead.
#[derive(Clone)]
pub struct EventBus {
    world: broadcast::Sender<Event>,
    snapshot: broadcast::Sender<Event>,
    session: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            world: broadcast::channel(capacity).0,
            snapshot: broadcast::channel(capacity).0,
            session: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::World => &self.world,
            Topic::Snapshot => &self.snapshot,
            Topic::Session => &self.session,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Whether anyone listens on `topic`.
    pub fn has_subscribers(&self, topic: Topic) -> bool {
        self.sender(topic).receiver_count() > 0
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_core::ActorId;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut world = bus.subscribe(Topic::World);
        let mut session = bus.subscribe(Topic::Session);

        bus.publish(Event::Session(SessionEvent::LoggedOut {
            name: "alice".into(),
            actor: ActorId(1),
        }));

        assert!(matches!(
            session.recv().await.unwrap(),
            Event::Session(SessionEvent::LoggedOut { .. })
        ));
        assert!(world.try_recv().is_err());
        assert!(!bus.has_subscribers(Topic::Snapshot));
    }
}
