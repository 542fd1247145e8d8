//! Player inventory and item stacks.
//!
//! Every mutation is expressed on whole slots: either every slot involved
//! changes or none does.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// A stack of identical items occupying one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub item: String,
    pub amount: u16,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, amount: u16) -> Self {
        Self {
            item: item.into(),
            amount,
        }
    }
}

pub type Slot = Option<ItemStack>;

/// Fixed-size slot array. Empty slots are `None`; a stack never has amount 0.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: ArrayVec<Slot, { GameConfig::INVENTORY_SLOTS }>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory {
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

    /// Mutable access to a slot, `None` if the index is out of bounds.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.slots.len()
    }

    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if !self.contains_index(a) || !self.contains_index(b) {
            return false;
        }
        self.slots.swap(a, b);
        true
    }

    /// Moves half of `from` into the empty slot `to`. The source keeps the
    /// larger half, so an amount of 7 splits into 4 (source) and 3.
    pub fn split(&mut self, from: usize, to: usize) -> bool {
        if from == to || self.get(to).is_some() || !self.contains_index(to) {
            return false;
        }
        let Some(source) = self.slots.get_mut(from).and_then(Option::as_mut) else {
            return false;
        };
        if source.amount < 2 {
            return false;
        }
        let moved = source.amount / 2;
        source.amount -= moved;
        let item = source.item.clone();
        self.slots[to] = Some(ItemStack::new(item, moved));
        true
    }

    /// Moves as much of `from` into `to` as `max_stack` allows. Both slots must
    /// hold the same item and `to` must have room.
    pub fn merge(&mut self, from: usize, to: usize, max_stack: u16) -> bool {
        if from == to {
            return false;
        }
        let (Some(source), Some(dest)) = (self.get(from), self.get(to)) else {
            return false;
        };
        if source.item != dest.item || dest.amount >= max_stack {
            return false;
        }
        let moved = source.amount.min(max_stack - dest.amount);
        let remaining = source.amount - moved;
        if let Some(dest) = self.slots[to].as_mut() {
            dest.amount += moved;
        }
        if remaining == 0 {
            self.slots[from] = None;
        } else if let Some(source) = self.slots[from].as_mut() {
            source.amount = remaining;
        }
        true
    }

    pub fn count(&self, item: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item == item)
            .map(|stack| u32::from(stack.amount))
            .sum()
    }

    /// Whether `amount` units of `item` fit, filling partial stacks first.
    pub fn can_add(&self, item: &str, amount: u16, max_stack: u16) -> bool {
        let max_stack = max_stack.max(1);
        let mut room: u32 = 0;
        for slot in &self.slots {
            room += match slot {
                None => u32::from(max_stack),
                Some(stack) if stack.item == item => {
                    u32::from(max_stack.saturating_sub(stack.amount))
                }
                Some(_) => 0,
            };
            if room >= u32::from(amount) {
                return true;
            }
        }
        amount == 0
    }

    /// Adds `amount` units of `item`, or nothing at all if they do not fit.
    pub fn add(&mut self, item: &str, amount: u16, max_stack: u16) -> bool {
        if !self.can_add(item, amount, max_stack) {
            return false;
        }
        let max_stack = max_stack.max(1);
        let mut left = amount;
        for stack in self.slots.iter_mut().flatten() {
            if left == 0 {
                break;
            }
            if stack.item == item && stack.amount < max_stack {
                let moved = left.min(max_stack - stack.amount);
                stack.amount += moved;
                left -= moved;
            }
        }
        for slot in self.slots.iter_mut() {
            if left == 0 {
                break;
            }
            if slot.is_none() {
                let moved = left.min(max_stack);
                *slot = Some(ItemStack::new(item, moved));
                left -= moved;
            }
        }
        true
    }

    /// Removes `amount` units of `item` across stacks, or nothing if short.
    pub fn remove(&mut self, item: &str, amount: u16) -> bool {
        if self.count(item) < u32::from(amount) {
            return false;
        }
        let mut left = amount;
        for slot in self.slots.iter_mut() {
            if left == 0 {
                break;
            }
            if let Some(stack) = slot
                && stack.item == item
            {
                let taken = left.min(stack.amount);
                stack.amount -= taken;
                left -= taken;
                if stack.amount == 0 {
                    *slot = None;
                }
            }
        }
        true
    }

    /// Removes `amount` units from one slot; the slot empties at zero.
    pub fn take_from(&mut self, index: usize, amount: u16) -> Option<ItemStack> {
        let slot = self.slots.get_mut(index)?;
        let stack = slot.as_mut()?;
        if amount == 0 || stack.amount < amount {
            return None;
        }
        stack.amount -= amount;
        let taken = ItemStack::new(stack.item.clone(), amount);
        if stack.amount == 0 {
            *slot = None;
        }
        Some(taken)
    }
}
