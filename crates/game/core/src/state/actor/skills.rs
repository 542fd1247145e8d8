//! Learned skill instances and active buffs.
//!
//! Both carry only per-actor mutable state; the shared templates live in
//! [`crate::env::SkillDefinition`] and [`crate::env::BuffDefinition`].

use crate::state::WorldTime;

/// One learned skill on an actor.
///
/// `cast_time_end` and `cooldown_end` only move forward with world time,
/// except for an explicit [`Skill::reset_timers`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    /// Level 0 means known but not learned yet.
    pub level: u32,
    pub cast_time_end: WorldTime,
    pub cooldown_end: WorldTime,
}

impl Skill {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            cast_time_end: WorldTime::ZERO,
            cooldown_end: WorldTime::ZERO,
        }
    }

    pub fn is_learned(&self) -> bool {
        self.level > 0
    }

    pub fn is_ready(&self, now: WorldTime) -> bool {
        now >= self.cooldown_end
    }

    /// Arms both timers; neither is ever moved backwards here.
    pub fn arm(&mut self, cast_time_end: WorldTime, cooldown_end: WorldTime) {
        self.cast_time_end = self.cast_time_end.max(cast_time_end);
        self.cooldown_end = self.cooldown_end.max(cooldown_end);
    }

    pub fn reset_timers(&mut self) {
        self.cast_time_end = WorldTime::ZERO;
        self.cooldown_end = WorldTime::ZERO;
    }
}

/// A time-limited modifier instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub name: String,
    pub level: u32,
    pub buff_time_end: WorldTime,
}

impl Buff {
    /// A buff whose end has passed is inert even before it is swept.
    pub fn is_active(&self, now: WorldTime) -> bool {
        now < self.buff_time_end
    }
}

/// Active buffs of an actor; at most one instance per name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buffs(Vec<Buff>);

impl Buffs {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.0.iter()
    }

    pub fn active(&self, now: WorldTime) -> impl Iterator<Item = &Buff> {
        self.0.iter().filter(move |buff| buff.is_active(now))
    }

    pub fn has_active(&self, name: &str, now: WorldTime) -> bool {
        self.active(now).any(|buff| buff.name == name)
    }

    /// Adds a buff or refreshes the existing instance of the same name.
    pub fn apply(&mut self, name: &str, level: u32, buff_time_end: WorldTime) {
        match self.0.iter_mut().find(|buff| buff.name == name) {
            Some(buff) => {
                buff.level = level;
                buff.buff_time_end = buff_time_end;
            }
            None => self.0.push(Buff {
                name: name.to_string(),
                level,
                buff_time_end,
            }),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.0.retain(|buff| buff.name != name);
    }

    pub fn retain(&mut self, keep: impl FnMut(&Buff) -> bool) {
        self.0.retain(keep);
    }

    /// Drops inert buffs. Returns true if anything was removed.
    pub fn sweep(&mut self, now: WorldTime) -> bool {
        let before = self.0.len();
        self.0.retain(|buff| buff.is_active(now));
        before != self.0.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_buff_is_absent_before_sweep() {
        let mut buffs = Buffs::new();
        buffs.apply("Haste", 1, WorldTime(1_000));

        assert!(buffs.has_active("Haste", WorldTime(999)));
        assert!(!buffs.has_active("Haste", WorldTime(1_000)));
        assert_eq!(buffs.len(), 1);

        assert!(buffs.sweep(WorldTime(1_000)));
        assert!(buffs.is_empty());
    }

    #[test]
    fn apply_refreshes_existing_instance() {
        let mut buffs = Buffs::new();
        buffs.apply("Offender", 1, WorldTime(1_000));
        buffs.apply("Offender", 1, WorldTime(5_000));

        assert_eq!(buffs.len(), 1);
        assert!(buffs.has_active("Offender", WorldTime(4_000)));
    }

    #[test]
    fn arming_never_moves_timers_backwards() {
        let mut skill = Skill::new("Strike", 1);
        skill.arm(WorldTime(2_000), WorldTime(5_000));
        skill.arm(WorldTime(1_000), WorldTime(3_000));

        assert_eq!(skill.cast_time_end, WorldTime(2_000));
        assert_eq!(skill.cooldown_end, WorldTime(5_000));
    }
}
