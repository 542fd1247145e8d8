//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. The snapshot topic is the replication feed: one
//! [`realm_core::WorldSnapshot`] per tick.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{SessionEvent, WorldEvent};
