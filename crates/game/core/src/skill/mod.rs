//! Skill cast pipeline.
//!
//! ```text
//! request ──► check_self ──► check_target ──► check_distance ──► start_cast
//!                                                                   │
//!                                  cast_time_end reached ◄──────────┘
//!                                            │
//!                                       finish_cast ──► effect (level at start)
//! ```
//!
//! Cooldowns are armed at cast start as `cast_time_end + cooldown`, so a
//! cancelled cast still pays its cooldown.

mod cast;
mod checks;
mod effects;
mod error;

pub use cast::{cancel_cast, finish_cast, start_cast};
pub use checks::{Reach, check_distance, check_self, check_target, friendly_target};
pub use effects::deal_damage;
pub use error::CastError;
