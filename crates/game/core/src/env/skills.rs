//! Skill and buff templates.
//!
//! Templates are immutable and shared by every actor. Per-actor mutable state
//! (level, cast/cooldown timers) lives in [`crate::state::Skill`] and
//! [`crate::state::Buff`].

/// Unsigned value that grows linearly with level.
///
/// `at(level) = base + per_level * (level - 1)`; level 0 and 1 both yield `base`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearU32 {
    pub base: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_level: u32,
}

impl LinearU32 {
    pub const ZERO: Self = Self::fixed(0);

    pub const fn new(base: u32, per_level: u32) -> Self {
        Self { base, per_level }
    }

    pub const fn fixed(base: u32) -> Self {
        Self { base, per_level: 0 }
    }

    pub fn at(&self, level: u32) -> u32 {
        self.base
            .saturating_add(self.per_level.saturating_mul(level.saturating_sub(1)))
    }
}

/// Floating point counterpart of [`LinearU32`], used for ranges and radii.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearF32 {
    pub base: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_level: f32,
}

impl LinearF32 {
    pub const fn new(base: f32, per_level: f32) -> Self {
        Self { base, per_level }
    }

    pub const fn fixed(base: f32) -> Self {
        Self {
            base,
            per_level: 0.0,
        }
    }

    pub fn at(&self, level: u32) -> f32 {
        self.base + self.per_level * level.saturating_sub(1) as f32
    }
}

/// What a finished cast does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Damage the current target, optionally stunning it.
    TargetDamage {
        damage: LinearU32,
        #[cfg_attr(feature = "serde", serde(default))]
        stun_ms: LinearU32,
    },
    /// Damage every attackable actor within `radius` of the caster.
    AreaDamage { damage: LinearU32, radius: LinearF32 },
    /// Restore the target's resources, or the caster's when no friendly
    /// target is selected.
    TargetHeal {
        #[cfg_attr(feature = "serde", serde(default))]
        health: LinearU32,
        #[cfg_attr(feature = "serde", serde(default))]
        mana: LinearU32,
    },
    /// Apply a buff to the caster.
    SelfBuff { buff: String },
    /// Apply a buff to a friendly target, or the caster when none is selected.
    TargetBuff { buff: String },
}

impl SkillEffect {
    /// Whether the cast must have a valid, attackable target to start.
    pub fn requires_target(&self) -> bool {
        matches!(self, Self::TargetDamage { .. })
    }

    /// Whether the effect lands on a friendly actor (self or ally).
    pub fn is_friendly(&self) -> bool {
        matches!(self, Self::TargetHeal { .. } | Self::TargetBuff { .. })
    }
}

/// Ammunition consumed from the caster's inventory at cast start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoCost {
    pub item: String,
    pub amount: u16,
}

/// Immutable skill template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub name: String,
    pub max_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_time_ms: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_ms: LinearU32,
    pub cast_range: LinearF32,
    pub effect: SkillEffect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ammo: Option<AmmoCost>,
    /// Abort the cast when the target dies or disappears before it finishes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cancel_cast_if_target_died: bool,
    /// The client chains into the default attack once this cast finishes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub followup_default_attack: bool,
}

/// Immutable buff template.
///
/// Bonuses scale with the buff level, which is the level of the skill (or
/// item) that applied it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffDefinition {
    pub name: String,
    pub duration_ms: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub health_max_bonus: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_max_bonus: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_bonus: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_bonus: LinearU32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub remain_after_death: bool,
}

/// Lookup of skill and buff templates by name.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, name: &str) -> Option<&SkillDefinition>;

    fn buff(&self, name: &str) -> Option<&BuffDefinition>;
}
