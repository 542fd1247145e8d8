//! Bonuses contributed by equipment and active buffs.

use crate::env::GameEnv;
use crate::state::{ActorRecord, WorldTime};

/// Summed additive bonuses for one actor at one moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bonuses {
    pub health_max: u32,
    pub mana_max: u32,
    pub damage: u32,
    pub defense: u32,
}

impl Bonuses {
    fn add(&mut self, health_max: u32, mana_max: u32, damage: u32, defense: u32) {
        self.health_max = self.health_max.saturating_add(health_max);
        self.mana_max = self.mana_max.saturating_add(mana_max);
        self.damage = self.damage.saturating_add(damage);
        self.defense = self.defense.saturating_add(defense);
    }
}

/// Collects bonuses from equipped items and active buffs.
///
/// Unknown item or buff names contribute nothing; they are reported when a
/// record is restored, not on every recomputation.
pub fn collect(actor: &ActorRecord, env: &GameEnv<'_>, now: WorldTime) -> Bonuses {
    let mut bonuses = Bonuses::default();

    if let Some(player) = actor.player()
        && let Ok(items) = env.items()
    {
        for stack in player.equipment.items() {
            if let Some(def) = items.item(&stack.item) {
                let b = def.bonuses;
                bonuses.add(b.health_max, b.mana_max, b.damage, b.defense);
            }
        }
    }

    if let Ok(skills) = env.skills() {
        for buff in actor.buffs.active(now) {
            if let Some(def) = skills.buff(&buff.name) {
                bonuses.add(
                    def.health_max_bonus.at(buff.level),
                    def.mana_max_bonus.at(buff.level),
                    def.damage_bonus.at(buff.level),
                    def.defense_bonus.at(buff.level),
                );
            }
        }
    }

    bonuses
}
