use arrayvec::ArrayVec;

use super::inventory::{ItemStack, Slot};
use crate::config::GameConfig;
use crate::env::ItemCategory;

/// Category accepted by each equipment slot, by slot index.
pub const EQUIPMENT_LAYOUT: [ItemCategory; GameConfig::EQUIPMENT_SLOTS] = [
    ItemCategory::Weapon,
    ItemCategory::Head,
    ItemCategory::Chest,
    ItemCategory::Legs,
    ItemCategory::Shield,
];

/// Equipped items, laid out per [`EQUIPMENT_LAYOUT`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    slots: ArrayVec<Slot, { GameConfig::EQUIPMENT_SLOTS }>,
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}

impl Equipment {
    pub fn new() -> Self {
        let mut slots = ArrayVec::new();
        while !slots.is_full() {
            slots.push(None);
        }
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn category(index: usize) -> Option<ItemCategory> {
        EQUIPMENT_LAYOUT.get(index).copied()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }
}
