//! Skill use that has to wait for range or cooldown.
//!
//! A skill requested out of range (or still cooling down) is kept as a
//! [`SkillIntent`]. Every snapshot re-evaluates it with the same distance
//! check the server runs: out of range produces a fresh approach point, in
//! range and ready produces the real `UseSkill` command, and a target that is
//! gone, dead or no longer selected drops the intent.

use realm_core::skill::{Reach, check_distance};
use realm_core::{ActorCategory, ActorId, ActorSnapshot, GameConfig, GameEnv, Position, WorldSnapshot};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkillIntent {
    pub skill: usize,
    /// The target selected when the skill was requested.
    pub target: Option<ActorId>,
    /// Last approach point sent to the server.
    pub destination: Option<Position>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntentStep {
    /// In range and off cooldown: send the cast now.
    Cast,
    /// Walk toward this point first.
    Approach(Position),
    /// In range but cooling down.
    Wait,
    /// The intent can no longer succeed.
    Drop(&'static str),
}

impl SkillIntent {
    pub fn new(skill: usize, target: Option<ActorId>) -> Self {
        Self {
            skill,
            target,
            destination: None,
        }
    }

    /// Decides the next step for the local actor `me`.
    pub fn evaluate(&self, me: &ActorSnapshot, world: &WorldSnapshot, env: &GameEnv<'_>) -> IntentStep {
        let Some(skill) = me.skills.get(self.skill) else {
            return IntentStep::Drop("unknown skill index");
        };
        let Ok(def) = env.skill(&skill.name) else {
            return IntentStep::Drop("unknown skill");
        };
        if self.target != me.target {
            return IntentStep::Drop("target changed");
        }

        let target = self.target.and_then(|id| world.actor(id));
        let ranged_target = if def.effect.requires_target() {
            match target {
                Some(target) if target.is_alive() && is_attackable(me, target) => Some(target),
                _ => return IntentStep::Drop("target lost"),
            }
        } else if def.effect.is_friendly() {
            target.filter(|target| is_friendly(me, target))
        } else {
            None
        };

        if let Some(target) = ranged_target {
            let factor = env
                .rules()
                .map_or(GameConfig::DEFAULT_APPROACH_FACTOR, |rules| rules.approach_factor);
            let range = def.cast_range.at(skill.level);
            if let Reach::OutOfRange { approach, .. } =
                check_distance(me.position, target.position, range, factor)
            {
                return IntentStep::Approach(approach);
            }
        }

        if skill.cooldown_remaining_ms > 0 {
            IntentStep::Wait
        } else {
            IntentStep::Cast
        }
    }
}

/// Whether the local player may attack `target`.
pub fn is_attackable(me: &ActorSnapshot, target: &ActorSnapshot) -> bool {
    if target.id == me.id {
        return false;
    }
    match target.category {
        ActorCategory::Player | ActorCategory::Monster => true,
        ActorCategory::Pet | ActorCategory::Mount => target.owner != Some(me.id),
        ActorCategory::Npc => false,
    }
}

/// Whether a friendly skill cast by the local player lands on `target`.
pub fn is_friendly(me: &ActorSnapshot, target: &ActorSnapshot) -> bool {
    target.is_alive()
        && !matches!(target.category, ActorCategory::Monster | ActorCategory::Npc)
        && !is_attackable(me, target)
}
