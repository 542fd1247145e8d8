//! Conversion between live player actors and persisted character records.
//!
//! The world clock restarts with the process, so every timer is stored as
//! the time remaining at save and rebuilt as `now + remaining` at load.
//! References that no longer resolve against current content are dropped
//! with a [`RestoreWarning`]; the rest of the record still loads.

use tracing::warn;

use crate::env::GameEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::spawn::{self, SpawnError};
use crate::state::{ActorRecord, BehaviorState, Equipment, ItemStack, Position, WorldState, WorldTime};
use crate::stats::clamp_resources;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedSkill {
    pub name: String,
    pub level: u32,
    pub cast_remaining_ms: u64,
    pub cooldown_remaining_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedBuff {
    pub name: String,
    pub level: u32,
    pub remaining_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub name: String,
    pub template: String,
    pub level: u32,
    pub health: u32,
    pub mana: u32,
    pub position: Position,
    pub gold: u64,
    pub skill_points: u32,
    pub strength: u32,
    pub intelligence: u32,
    pub inventory: Vec<Option<ItemStack>>,
    pub equipment: Vec<Option<ItemStack>>,
    pub trash: Option<ItemStack>,
    pub skills: Vec<SavedSkill>,
    pub buffs: Vec<SavedBuff>,
}

/// A persisted reference that no longer matches current content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestoreWarning {
    #[error("unknown skill '{0}' skipped")]
    UnknownSkill(String),

    #[error("unknown buff '{0}' skipped")]
    UnknownBuff(String),

    #[error("unknown item '{0}' skipped")]
    UnknownItem(String),

    #[error("slot {index} with '{item}' no longer exists")]
    SlotOutOfRange { index: usize, item: String },

    #[error("'{item}' no longer fits equipment slot {index}")]
    EquipmentMismatch { index: usize, item: String },
}

impl GameError for RestoreWarning {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSkill(_) => "RESTORE_UNKNOWN_SKILL",
            Self::UnknownBuff(_) => "RESTORE_UNKNOWN_BUFF",
            Self::UnknownItem(_) => "RESTORE_UNKNOWN_ITEM",
            Self::SlotOutOfRange { .. } => "RESTORE_SLOT_OUT_OF_RANGE",
            Self::EquipmentMismatch { .. } => "RESTORE_EQUIPMENT_MISMATCH",
        }
    }
}

impl CharacterRecord {
    /// Captures a player actor. `None` for any other category.
    pub fn capture(actor: &ActorRecord, now: WorldTime) -> Option<Self> {
        let player = actor.player()?;
        Some(Self {
            name: actor.name.clone(),
            template: player.template.clone(),
            level: actor.level,
            health: actor.health,
            mana: actor.mana,
            position: actor.position,
            gold: actor.gold,
            skill_points: player.skill_points,
            strength: player.strength,
            intelligence: player.intelligence,
            inventory: player.inventory.slots().to_vec(),
            equipment: player.equipment.slots().to_vec(),
            trash: player.trash.clone(),
            skills: actor
                .skills
                .iter()
                .map(|skill| SavedSkill {
                    name: skill.name.clone(),
                    level: skill.level,
                    cast_remaining_ms: now.remaining_until(skill.cast_time_end),
                    cooldown_remaining_ms: now.remaining_until(skill.cooldown_end),
                })
                .collect(),
            buffs: actor
                .buffs
                .active(now)
                .map(|buff| SavedBuff {
                    name: buff.name.clone(),
                    level: buff.level,
                    remaining_ms: now.remaining_until(buff.buff_time_end),
                })
                .collect(),
        })
    }

    /// Rebuilds a player actor at the current world time. The record is not
    /// inserted; the caller decides when the actor enters the world.
    pub fn restore(
        &self,
        world: &mut WorldState,
        env: &GameEnv<'_>,
    ) -> Result<(ActorRecord, Vec<RestoreWarning>), SpawnError> {
        let now = world.time();
        let mut actor = spawn::new_player(world, env, &self.template, &self.name, self.position)?;
        let mut warnings = Vec::new();

        actor.level = self.level.max(1);
        actor.gold = self.gold;

        // Skills come from the class template; the record only carries levels
        // and timers for the ones it knows.
        for saved in &self.skills {
            let Some(skill) = actor.skills.iter_mut().find(|skill| skill.name == saved.name) else {
                warnings.push(RestoreWarning::UnknownSkill(saved.name.clone()));
                continue;
            };
            skill.level = saved.level;
            skill.arm(now + saved.cast_remaining_ms, now + saved.cooldown_remaining_ms);
        }

        for saved in &self.buffs {
            if env.buff(&saved.name).is_err() {
                warnings.push(RestoreWarning::UnknownBuff(saved.name.clone()));
                continue;
            }
            actor
                .buffs
                .apply(&saved.name, saved.level, now + saved.remaining_ms);
        }

        if let Some(player) = actor.player_mut() {
            player.skill_points = self.skill_points;
            player.strength = self.strength;
            player.intelligence = self.intelligence;
            player.inventory = Default::default();
            player.equipment = Default::default();
            player.trash = self
                .trash
                .as_ref()
                .filter(|stack| known_item(env, stack, &mut warnings))
                .cloned();

            for (index, stack) in self.inventory.iter().enumerate() {
                let Some(stack) = stack.as_ref().filter(|s| known_item(env, s, &mut warnings)) else {
                    continue;
                };
                match player.inventory.slot_mut(index) {
                    Some(slot) => *slot = Some(stack.clone()),
                    None => warnings.push(RestoreWarning::SlotOutOfRange {
                        index,
                        item: stack.item.clone(),
                    }),
                }
            }

            for (index, stack) in self.equipment.iter().enumerate() {
                let Some(stack) = stack.as_ref().filter(|s| known_item(env, s, &mut warnings)) else {
                    continue;
                };
                let fits = Equipment::category(index).is_some_and(|category| {
                    env.item(&stack.item).is_ok_and(|def| def.category == category)
                });
                match player.equipment.slot_mut(index) {
                    Some(slot) if fits => *slot = Some(stack.clone()),
                    _ => warnings.push(RestoreWarning::EquipmentMismatch {
                        index,
                        item: stack.item.clone(),
                    }),
                }
            }
        }

        actor.health = self.health;
        actor.mana = self.mana;
        clamp_resources(&mut actor, env, now);
        if actor.health == 0 {
            actor.state = BehaviorState::Dead;
        }

        for warning in &warnings {
            warn!(
                target: "realm::persist",
                character = %self.name,
                code = warning.error_code(),
                "{warning}"
            );
        }
        Ok((actor, warnings))
    }
}

fn known_item(env: &GameEnv<'_>, stack: &ItemStack, warnings: &mut Vec<RestoreWarning>) -> bool {
    let known = env.item(&stack.item).is_ok();
    if !known {
        warnings.push(RestoreWarning::UnknownItem(stack.item.clone()));
    }
    known
}
