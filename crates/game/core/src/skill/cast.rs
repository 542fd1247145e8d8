//! Cast start, finish and cancellation.

use tracing::{debug, warn};

use super::checks::{Reach, check_distance, check_self, check_target};
use super::{CastError, effects};
use crate::engine::HookRegistry;
use crate::env::GameEnv;
use crate::state::{ActiveCast, ActorId, WorldState};

/// Runs the self, target and distance checks for skill `index` and, when all
/// pass, commits the cast: mana and ammo are charged, the cast and cooldown
/// timers are armed and an [`ActiveCast`] snapshot is stored.
///
/// On failure nothing is changed.
pub fn start_cast(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    id: ActorId,
    index: usize,
) -> Result<(), CastError> {
    let now = world.time();
    let caster = world.actor(id).ok_or(CastError::ActorNotFound(id))?;
    let skill = caster
        .skills
        .get(index)
        .ok_or(CastError::SkillIndexOutOfRange {
            index,
            len: caster.skills.len(),
        })?;
    let def = env.skill(&skill.name)?;
    let level = skill.level;

    check_self(caster, index, def, level, now)?;
    let target = check_target(world, caster, def)?;

    if let Some(target_pos) = target
        .filter(|target| *target != id)
        .and_then(|target| world.actor(target))
        .map(|target| target.position)
    {
        let range = def.cast_range.at(level);
        let factor = env.rules()?.approach_factor;
        if let Reach::OutOfRange { approach, distance } =
            check_distance(caster.position, target_pos, range, factor)
        {
            return Err(CastError::OutOfRange {
                distance,
                range,
                approach,
            });
        }
    }

    let cast_time = u64::from(def.cast_time_ms.at(level));
    let cooldown = u64::from(def.cooldown_ms.at(level));
    let mana_cost = def.mana_cost.at(level);

    let caster = world.actor_mut(id).ok_or(CastError::ActorNotFound(id))?;
    if let Some(ammo) = &def.ammo
        && let Some(player) = caster.player_mut()
    {
        player.inventory.remove(&ammo.item, ammo.amount);
    }
    caster.mana = caster.mana.saturating_sub(mana_cost);

    let cast_time_end = now + cast_time;
    if let Some(skill) = caster.skills.get_mut(index) {
        skill.arm(cast_time_end, cast_time_end + cooldown);
    }
    caster.active_cast = Some(ActiveCast {
        skill_index: index,
        skill_name: def.name.clone(),
        level,
        target,
        cast_time_end,
    });

    debug!(
        target: "realm::skill",
        actor = %id,
        skill = %def.name,
        level,
        ends = %cast_time_end,
        "cast started"
    );
    Ok(())
}

/// Applies the committed cast's effect exactly once and clears it.
pub fn finish_cast(world: &mut WorldState, env: &GameEnv<'_>, hooks: &HookRegistry, id: ActorId) {
    let Some(actor) = world.actor_mut(id) else {
        return;
    };
    let Some(cast) = actor.active_cast.take() else {
        return;
    };
    actor.casts_completed += 1;
    actor.last_finished_skill = Some(cast.skill_index);

    match env.skill(&cast.skill_name) {
        Ok(def) => {
            debug!(target: "realm::skill", actor = %id, skill = %cast.skill_name, "cast finished");
            effects::apply(world, env, hooks, id, &cast, def);
        }
        Err(err) => {
            warn!(target: "realm::skill", actor = %id, error = %err, "finished cast lost its definition");
        }
    }
}

/// Aborts the active cast. The cooldown armed at start stays in place.
pub fn cancel_cast(world: &mut WorldState, id: ActorId) {
    if let Some(actor) = world.actor_mut(id)
        && let Some(cast) = actor.active_cast.take()
    {
        debug!(target: "realm::skill", actor = %id, skill = %cast.skill_name, "cast cancelled");
    }
}
