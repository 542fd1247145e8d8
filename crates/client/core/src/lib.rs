//! Client-side prediction and reconciliation.
//!
//! The client never mutates authoritative state. It sends commands through a
//! [`CommandSink`] and keeps its own prediction (local position, one pending
//! action, one skill intent) apart from the replicated data. Every
//! [`realm_core::WorldSnapshot`] reconciles that prediction.
pub mod config;
pub mod intent;
pub mod pending;
pub mod predictor;
pub mod sink;

pub use config::PredictionConfig;
pub use intent::{IntentStep, SkillIntent};
pub use pending::PendingAction;
pub use predictor::{Correction, Predictor};
pub use sink::CommandSink;
