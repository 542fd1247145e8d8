//! Effect application for finished casts, and the damage pipeline.

use tracing::debug;

use crate::engine::{DamageEvent, HookRegistry};
use crate::env::{GameEnv, SkillDefinition, SkillEffect};
use crate::pvp;
use crate::state::{ActiveCast, ActorId, WorldState, can_attack};
use crate::stats::DerivedStats;

pub(super) fn apply(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    caster: ActorId,
    cast: &ActiveCast,
    def: &SkillDefinition,
) {
    let level = cast.level;
    match &def.effect {
        SkillEffect::TargetDamage { damage, stun_ms } => {
            let Some(target) = cast.target else {
                return;
            };
            if attackable(world, caster, target) {
                deal_damage(
                    world,
                    env,
                    hooks,
                    caster,
                    target,
                    damage.at(level),
                    u64::from(stun_ms.at(level)),
                );
            }
        }
        SkillEffect::AreaDamage { damage, radius } => {
            let Some(origin) = world.actor(caster).map(|actor| actor.position) else {
                return;
            };
            let radius = radius.at(level);
            let victims: Vec<ActorId> = world
                .actors()
                .filter(|victim| victim.position.distance(origin) <= radius)
                .map(|victim| victim.id)
                .filter(|victim| attackable(world, caster, *victim))
                .collect();
            for victim in victims {
                deal_damage(world, env, hooks, caster, victim, damage.at(level), 0);
            }
        }
        SkillEffect::TargetHeal { health, mana } => {
            let recipient = friendly_recipient(world, caster, cast.target);
            let now = world.time();
            let Some(actor) = world.actor_mut(recipient) else {
                return;
            };
            let stats = DerivedStats::compute(actor, env, now);
            actor.health = actor
                .health
                .saturating_add(health.at(level))
                .min(stats.health_max);
            actor.mana = actor.mana.saturating_add(mana.at(level)).min(stats.mana_max);
        }
        SkillEffect::SelfBuff { buff } => apply_buff(world, env, caster, buff, level),
        SkillEffect::TargetBuff { buff } => {
            let recipient = friendly_recipient(world, caster, cast.target);
            apply_buff(world, env, recipient, buff, level);
        }
    }
}

/// Living and attackable by `attacker` right now.
fn attackable(world: &WorldState, attacker: ActorId, victim: ActorId) -> bool {
    match (world.actor(attacker), world.actor(victim)) {
        (Some(a), Some(v)) => v.is_alive() && can_attack(&a.kind, a.id, &v.kind, v.id),
        _ => false,
    }
}

/// The committed friendly target if it is still alive, otherwise the caster.
fn friendly_recipient(world: &WorldState, caster: ActorId, target: Option<ActorId>) -> ActorId {
    target
        .filter(|id| world.actor(*id).is_some_and(|actor| actor.is_alive()))
        .unwrap_or(caster)
}

fn apply_buff(world: &mut WorldState, env: &GameEnv<'_>, id: ActorId, buff: &str, level: u32) {
    let Ok(def) = env.buff(buff) else {
        debug!(target: "realm::skill", actor = %id, buff, "unknown buff ignored");
        return;
    };
    let now = world.time();
    if let Some(actor) = world.actor_mut(id) {
        actor
            .buffs
            .apply(&def.name, level, now + u64::from(def.duration_ms.at(level)));
    }
}

/// Applies one hit from `attacker` to `victim`.
///
/// Damage is `attacker damage + skill damage - victim defense`, at least 1.
/// The victim's innocence is captured before the hit, then the
/// `on_damage_dealt` hooks run; the PvP status module is one of them.
pub fn deal_damage(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    hooks: &HookRegistry,
    attacker: ActorId,
    victim: ActorId,
    skill_damage: u32,
    stun_ms: u64,
) -> Option<DamageEvent> {
    let now = world.time();
    let raw = DerivedStats::compute(world.actor(attacker)?, env, now)
        .damage
        .saturating_add(skill_damage);
    let defense = DerivedStats::compute(world.actor(victim)?, env, now).defense;
    let amount = raw.saturating_sub(defense).max(1);

    let victim_innocent = env
        .rules()
        .map(|rules| pvp::is_innocent(world, rules, victim, now))
        .unwrap_or(false);

    let target = world.actor_mut(victim)?;
    target.health = target.health.saturating_sub(amount);
    let killed = target.health == 0;
    if stun_ms > 0 && !killed {
        target.stun_end = target.stun_end.max(now + stun_ms);
    }

    debug!(
        target: "realm::skill",
        attacker = %attacker,
        victim = %victim,
        amount,
        killed,
        "damage dealt"
    );

    let event = DamageEvent {
        attacker,
        victim,
        amount,
        killed,
        victim_innocent,
    };
    hooks.damage_dealt(world, env, &event);
    Some(event)
}
