/// Game configuration constants and tunable defaults.
///
/// Capacities are compile-time constants. The tunable values seed
/// [`crate::env::WorldRules::default`] and are overridden by `rules.toml`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    // ===== compile-time capacities =====
    pub const INVENTORY_SLOTS: usize = 30;
    pub const TRASH_SLOTS: usize = 1;
    pub const EQUIPMENT_SLOTS: usize = 5;
    pub const MAX_SKILLS: usize = 16;
    pub const MAX_SHOP_ITEMS: usize = 32;
    pub const MAX_NAME_LEN: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INTERACTION_RANGE: f32 = 4.0;
    /// Fraction of the cast range used when suggesting an approach point, so
    /// the actor ends up strictly inside range instead of on its border.
    pub const DEFAULT_APPROACH_FACTOR: f32 = 0.9;
    pub const DEFAULT_RESPAWN_HEALTH_FRACTION: f32 = 0.5;
    pub const DEFAULT_MAX_MOVE_DISTANCE: f32 = 100.0;
    pub const DEFAULT_HEALTH_PER_STRENGTH: u32 = 10;
    pub const DEFAULT_MANA_PER_INTELLIGENCE: u32 = 10;

    pub const DEFAULT_OFFENDER_BUFF: &'static str = "Offender";
    pub const DEFAULT_OFFENDER_DURATION_MS: u64 = 60_000;
    pub const DEFAULT_MURDERER_BUFF: &'static str = "Murderer";
    pub const DEFAULT_MURDERER_DURATION_MS: u64 = 300_000;

    /// Index of the default attack in every actor's skill list.
    pub const DEFAULT_ATTACK: usize = 0;
}
