use crate::config::GameConfig;
use crate::state::Position;

/// Data-driven world rules, loaded from `rules.toml`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldRules {
    /// Maximum distance for looting and trading with an NPC.
    pub interaction_range: f32,
    pub approach_factor: f32,
    /// Fraction of maximum health restored on a player respawn, in `(0, 1]`.
    pub respawn_health_fraction: f32,
    pub revival_point: Position,
    /// Longest accepted single move request, measured from the current position.
    pub max_move_distance: f32,
    pub health_per_strength: u32,
    pub mana_per_intelligence: u32,
    pub offender_buff: String,
    pub offender_duration_ms: u64,
    pub murderer_buff: String,
    pub murderer_duration_ms: u64,
}

impl Default for WorldRules {
    fn default() -> Self {
        Self {
            interaction_range: GameConfig::DEFAULT_INTERACTION_RANGE,
            approach_factor: GameConfig::DEFAULT_APPROACH_FACTOR,
            respawn_health_fraction: GameConfig::DEFAULT_RESPAWN_HEALTH_FRACTION,
            revival_point: Position::ORIGIN,
            max_move_distance: GameConfig::DEFAULT_MAX_MOVE_DISTANCE,
            health_per_strength: GameConfig::DEFAULT_HEALTH_PER_STRENGTH,
            mana_per_intelligence: GameConfig::DEFAULT_MANA_PER_INTELLIGENCE,
            offender_buff: GameConfig::DEFAULT_OFFENDER_BUFF.to_string(),
            offender_duration_ms: GameConfig::DEFAULT_OFFENDER_DURATION_MS,
            murderer_buff: GameConfig::DEFAULT_MURDERER_BUFF.to_string(),
            murderer_duration_ms: GameConfig::DEFAULT_MURDERER_DURATION_MS,
        }
    }
}

impl WorldRules {
    /// Whether `name` is one of the PvP status buffs.
    pub fn is_pvp_status(&self, name: &str) -> bool {
        name == self.offender_buff || name == self.murderer_buff
    }
}

/// Oracle exposing the world rules.
pub trait ConfigOracle: Send + Sync {
    fn rules(&self) -> &WorldRules;
}
