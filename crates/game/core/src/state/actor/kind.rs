//! Actor categories and their capability data.
//!
//! Category-dependent rules (attackability, ownership, mounting) are
//! exhaustive matches over [`ActorKind`].

use super::{Equipment, Inventory, ItemStack};
use crate::state::{ActorId, WorldTime};

/// Closed set of actor categories, as named in content and snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActorCategory {
    Player,
    Monster,
    Npc,
    Pet,
    Mount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerData {
    /// Character class template the player was created from.
    pub template: String,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub trash: Option<ItemStack>,
    pub skill_points: u32,
    pub strength: u32,
    pub intelligence: u32,
    pub pet: Option<ActorId>,
    pub mount: Option<ActorId>,
    pub mounted: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterData {
    pub template: String,
    /// Loot materialized on death, taken by players.
    pub loot_gold: u64,
    pub loot_items: Vec<Option<ItemStack>>,
    pub respawn_at: Option<WorldTime>,
}

impl MonsterData {
    pub fn has_loot(&self) -> bool {
        self.loot_gold > 0 || self.loot_items.iter().any(Option::is_some)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcData {
    pub template: String,
    pub shop: Vec<String>,
}

/// Pets and mounts: controlled by their owning player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanionData {
    pub template: String,
    pub owner: ActorId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    Player(Box<PlayerData>),
    Monster(MonsterData),
    Npc(NpcData),
    Pet(CompanionData),
    Mount(CompanionData),
}

impl ActorKind {
    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }

    pub fn category(&self) -> ActorCategory {
        match self {
            Self::Player(_) => ActorCategory::Player,
            Self::Monster(_) => ActorCategory::Monster,
            Self::Npc(_) => ActorCategory::Npc,
            Self::Pet(_) => ActorCategory::Pet,
            Self::Mount(_) => ActorCategory::Mount,
        }
    }

    /// Owner of a pet or mount.
    pub fn owner(&self) -> Option<ActorId> {
        match self {
            Self::Pet(data) | Self::Mount(data) => Some(data.owner),
            Self::Player(_) | Self::Monster(_) | Self::Npc(_) => None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        match self {
            Self::Player(data) => data.mounted,
            Self::Monster(_) | Self::Npc(_) | Self::Pet(_) | Self::Mount(_) => false,
        }
    }

    pub fn template(&self) -> &str {
        match self {
            Self::Player(data) => &data.template,
            Self::Monster(data) => &data.template,
            Self::Npc(data) => &data.template,
            Self::Pet(data) | Self::Mount(data) => &data.template,
        }
    }
}

/// Whether an actor of kind `attacker` (with `attacker_id`) may hit `victim`
/// (with `victim_id`).
///
/// Aliveness is checked separately by the skill pipeline.
pub fn can_attack(
    attacker: &ActorKind,
    attacker_id: ActorId,
    victim: &ActorKind,
    victim_id: ActorId,
) -> bool {
    use ActorKind::*;

    if attacker_id == victim_id {
        return false;
    }
    match (attacker, victim) {
        // NPCs are never part of combat.
        (Npc(_), _) | (_, Npc(_)) => false,
        // Mounts carry their owner and never fight.
        (Mount(_), _) => false,

        (Player(_), Monster(_) | Player(_)) => true,
        (Player(_), Pet(companion) | Mount(companion)) => companion.owner != attacker_id,

        (Monster(_), Player(_) | Pet(_) | Mount(_)) => true,
        (Monster(_), Monster(_)) => false,

        (Pet(_), Monster(_)) => true,
        (Pet(pet), Player(_)) => pet.owner != victim_id,
        (Pet(pet), Pet(other) | Mount(other)) => pet.owner != other.owner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companion(owner: u32) -> CompanionData {
        CompanionData {
            template: "Wolf".into(),
            owner: ActorId(owner),
        }
    }

    #[test]
    fn npcs_never_fight() {
        let npc = ActorKind::Npc(NpcData::default());
        let player = ActorKind::Player(Box::default());

        assert!(!can_attack(&player, ActorId(1), &npc, ActorId(2)));
        assert!(!can_attack(&npc, ActorId(2), &player, ActorId(1)));
    }

    #[test]
    fn players_cannot_hit_own_companions() {
        let player = ActorKind::Player(Box::default());
        let own_pet = ActorKind::Pet(companion(1));
        let other_pet = ActorKind::Pet(companion(9));

        assert!(!can_attack(&player, ActorId(1), &own_pet, ActorId(5)));
        assert!(can_attack(&player, ActorId(1), &other_pet, ActorId(6)));
    }

    #[test]
    fn pets_do_not_turn_on_their_side() {
        let pet = ActorKind::Pet(companion(1));
        let owner = ActorKind::Player(Box::default());
        let sibling = ActorKind::Mount(companion(1));
        let monster = ActorKind::Monster(MonsterData::default());

        assert!(!can_attack(&pet, ActorId(5), &owner, ActorId(1)));
        assert!(!can_attack(&pet, ActorId(5), &sibling, ActorId(6)));
        assert!(can_attack(&pet, ActorId(5), &monster, ActorId(7)));
    }

    #[test]
    fn nobody_attacks_itself() {
        let player = ActorKind::Player(Box::default());
        assert!(!can_attack(&player, ActorId(1), &player, ActorId(1)));
    }
}
