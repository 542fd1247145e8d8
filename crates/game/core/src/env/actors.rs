//! Actor templates used to spawn monsters, NPCs, companions and fresh players.

use crate::state::{ActorCategory, BaseStats, ItemStack};

/// A skill granted by a template, with its starting level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateSkill {
    pub name: String,
    pub level: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorTemplate {
    pub name: String,
    pub kind: ActorCategory,
    pub base: BaseStats,
    /// Skill index 0 is the default attack.
    pub skills: Vec<TemplateSkill>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot_gold: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot_items: Vec<ItemStack>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub respawn_ms: Option<u64>,
    /// Items sold by an NPC, by item name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub shop: Vec<String>,
    /// Starting inventory for fresh players.
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_items: Vec<ItemStack>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub starting_gold: u64,
}

/// Lookup of actor templates by name.
pub trait ActorOracle: Send + Sync {
    fn template(&self, name: &str) -> Option<&ActorTemplate>;
}
