//! Remote command surface and the gate that validates it.
//!
//! Commands are fire-and-forget: a rejected command is a silent no-op and the
//! client re-renders from the next snapshot. [`handle`] is the entry point the
//! runtime uses; [`try_handle`] exposes the rejection reason to tests and tools.

mod error;
mod gate;
mod inventory;
mod trade;

pub use error::CommandRejection;
pub use gate::{allowed_in, handle, try_handle};

use crate::state::{ActorId, Position, Velocity};

#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Move { destination: Position },
    Steer { velocity: Velocity },
    CancelAction,
    Respawn,
    UseSkill { index: usize },
    SetTarget { target: Option<ActorId> },
    SwapInventorySlots { a: usize, b: usize },
    SplitInventorySlot { from: usize, to: usize },
    MergeInventorySlot { from: usize, to: usize },
    MoveInventoryToTrash { index: usize },
    MoveTrashToInventory { index: usize },
    Equip { inventory: usize, equipment: usize },
    UseInventoryItem { index: usize },
    TakeLootGold,
    TakeLootItem { index: usize },
    UpgradeSkill { index: usize },
    ToggleMount,
    BuyItem { index: usize, amount: u16 },
    SellItem { index: usize, amount: u16 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Commands a player may issue on behalf of its pet or mount.
    pub fn is_companion_command(&self) -> bool {
        matches!(
            self,
            Self::Move { .. }
                | Self::Steer { .. }
                | Self::CancelAction
                | Self::SetTarget { .. }
                | Self::UseSkill { .. }
        )
    }
}

/// A sender-attributed command. `subject` is the actor the command acts on:
/// the sender itself or a companion it owns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Request {
    pub sender: ActorId,
    pub subject: ActorId,
    pub command: Command,
}

impl Request {
    /// A command acting on the sender's own actor.
    pub fn own(sender: ActorId, command: Command) -> Self {
        Self {
            sender,
            subject: sender,
            command,
        }
    }

    pub fn on_behalf(sender: ActorId, subject: ActorId, command: Command) -> Self {
        Self {
            sender,
            subject,
            command,
        }
    }
}
