//! The three cast gates: self, target and distance.
//!
//! All checks are pure reads. They are shared with the client prediction
//! layer so both sides agree on what "in range" means.

use super::CastError;
use crate::env::{SkillDefinition, SkillEffect};
use crate::state::{ActorId, ActorKind, ActorRecord, Position, WorldState, WorldTime, can_attack};

/// Result of the distance check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reach {
    /// Already in range; carries the caster's current position.
    InRange(Position),
    /// Out of range; carries the closest point worth walking to.
    OutOfRange { approach: Position, distance: f32 },
}

/// Caster alive, enough mana and ammo at `level`, skill off cooldown.
pub fn check_self(
    caster: &ActorRecord,
    index: usize,
    def: &SkillDefinition,
    level: u32,
    now: WorldTime,
) -> Result<(), CastError> {
    if !caster.is_alive() {
        return Err(CastError::CasterDead);
    }
    let skill = caster
        .skills
        .get(index)
        .ok_or(CastError::SkillIndexOutOfRange {
            index,
            len: caster.skills.len(),
        })?;
    if !skill.is_learned() {
        return Err(CastError::NotLearned(skill.name.clone()));
    }

    let required = def.mana_cost.at(level);
    if caster.mana < required {
        return Err(CastError::NotEnoughMana {
            required,
            available: caster.mana,
        });
    }

    if let Some(ammo) = &def.ammo {
        let available = caster
            .player()
            .map(|player| player.inventory.count(&ammo.item))
            .unwrap_or(0);
        if available < u32::from(ammo.amount) {
            return Err(CastError::NotEnoughAmmo {
                item: ammo.item.clone(),
                required: ammo.amount,
                available,
            });
        }
    }

    if !skill.is_ready(now) {
        return Err(CastError::OnCooldown {
            remaining_ms: now.remaining_until(skill.cooldown_end),
        });
    }
    Ok(())
}

/// Resolves who the cast will land on.
///
/// Damage-to-target skills need a living, attackable target other than the
/// caster. Friendly skills land on the selected target when it is a living
/// ally and on the caster otherwise. Self and area skills have no target.
pub fn check_target(
    world: &WorldState,
    caster: &ActorRecord,
    def: &SkillDefinition,
) -> Result<Option<ActorId>, CastError> {
    match &def.effect {
        SkillEffect::TargetDamage { .. } => {
            let id = caster.target.ok_or(CastError::NoTarget)?;
            if id == caster.id {
                return Err(CastError::TargetIsSelf);
            }
            let target = world.actor(id).ok_or(CastError::TargetNotFound(id))?;
            if !target.is_alive() {
                return Err(CastError::TargetDead(id));
            }
            if !can_attack(&caster.kind, caster.id, &target.kind, target.id) {
                return Err(CastError::TargetNotAttackable(id));
            }
            Ok(Some(id))
        }
        SkillEffect::TargetHeal { .. } | SkillEffect::TargetBuff { .. } => {
            Ok(Some(friendly_target(world, caster)))
        }
        SkillEffect::AreaDamage { .. } | SkillEffect::SelfBuff { .. } => Ok(None),
    }
}

/// The selected target if it is a living ally, otherwise the caster.
pub fn friendly_target(world: &WorldState, caster: &ActorRecord) -> ActorId {
    caster
        .target
        .and_then(|id| world.actor(id))
        .filter(|target| {
            target.is_alive()
                && !matches!(target.kind, ActorKind::Monster(_) | ActorKind::Npc(_))
                && !can_attack(&caster.kind, caster.id, &target.kind, target.id)
        })
        .map(|target| target.id)
        .unwrap_or(caster.id)
}

/// Compares the caster-target distance with `range`.
///
/// The approach point lies on the segment from the target toward the caster,
/// `range * approach_factor` away from the target, so walking there ends
/// strictly inside range.
pub fn check_distance(caster: Position, target: Position, range: f32, approach_factor: f32) -> Reach {
    let distance = caster.distance(target);
    if distance <= range {
        return Reach::InRange(caster);
    }
    let keep = (range * approach_factor).max(0.0);
    let approach = target.step_toward(caster, keep);
    Reach::OutOfRange { approach, distance }
}
