//! Derived maxima and combat values.
//!
//! Maximum values are computed on demand and never stored:
//! - health_max = base + level growth + equipment + strength + buffs
//! - mana_max = base + level growth + equipment + intelligence + buffs

use super::bonus::{self, Bonuses};
use crate::config::GameConfig;
use crate::env::GameEnv;
use crate::state::{ActorRecord, WorldTime};

/// Maxima and combat values of one actor at one moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedStats {
    pub health_max: u32,
    pub mana_max: u32,
    pub damage: u32,
    pub defense: u32,
}

impl DerivedStats {
    pub fn compute(actor: &ActorRecord, env: &GameEnv<'_>, now: WorldTime) -> Self {
        let bonuses = bonus::collect(actor, env, now);
        Self::from_parts(actor, env, &bonuses)
    }

    fn from_parts(actor: &ActorRecord, env: &GameEnv<'_>, bonuses: &Bonuses) -> Self {
        let base = &actor.base;
        let growth = actor.level.saturating_sub(1);

        let (per_strength, per_intelligence) = match env.rules() {
            Ok(rules) => (rules.health_per_strength, rules.mana_per_intelligence),
            Err(_) => (
                GameConfig::DEFAULT_HEALTH_PER_STRENGTH,
                GameConfig::DEFAULT_MANA_PER_INTELLIGENCE,
            ),
        };
        let (health_attr, mana_attr) = match actor.player() {
            Some(player) => (
                player.strength.saturating_mul(per_strength),
                player.intelligence.saturating_mul(per_intelligence),
            ),
            None => (0, 0),
        };

        let health_max = base
            .health_max
            .saturating_add(base.health_per_level.saturating_mul(growth))
            .saturating_add(bonuses.health_max)
            .saturating_add(health_attr);
        let mana_max = base
            .mana_max
            .saturating_add(base.mana_per_level.saturating_mul(growth))
            .saturating_add(bonuses.mana_max)
            .saturating_add(mana_attr);
        let damage = base
            .damage
            .saturating_add(base.damage_per_level.saturating_mul(growth))
            .saturating_add(bonuses.damage);
        let defense = base.defense.saturating_add(bonuses.defense);

        Self {
            health_max,
            mana_max,
            damage,
            defense,
        }
    }
}

/// Clamps current health and mana to the derived maxima.
pub fn clamp_resources(actor: &mut ActorRecord, env: &GameEnv<'_>, now: WorldTime) {
    let stats = DerivedStats::compute(actor, env, now);
    actor.health = actor.health.min(stats.health_max);
    actor.mana = actor.mana.min(stats.mana_max);
}

/// Sets health and mana to their maxima.
pub fn fill_resources(actor: &mut ActorRecord, env: &GameEnv<'_>, now: WorldTime) {
    let stats = DerivedStats::compute(actor, env, now);
    actor.health = stats.health_max;
    actor.mana = stats.mana_max;
}
