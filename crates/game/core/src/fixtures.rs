//! Shared test content: a small class, a few monsters, and their skills.

use crate::env::{
    ActorTemplate, AmmoCost, BuffDefinition, ContentSnapshot, GameEnv, ItemBonuses, ItemCategory,
    ItemDefinition, ItemUsage, LinearF32, LinearU32, SkillDefinition, SkillEffect,
    StraightLineAgent, TemplateSkill, WorldRules,
};
use crate::spawn;
use crate::state::{ActorCategory, ActorId, BaseStats, ItemStack, Position, WorldState, WorldTime};

static AGENT: StraightLineAgent = StraightLineAgent;

/// Skill indices in the Warrior template.
pub mod skills {
    pub const STRIKE: usize = 0;
    pub const FIREBALL: usize = 1;
    pub const BASH: usize = 2;
    pub const HEAL: usize = 3;
    pub const FORTIFY: usize = 4;
    pub const NOVA: usize = 5;
    pub const SHOOT: usize = 6;
}

fn skill(name: &str, range: f32, effect: SkillEffect) -> SkillDefinition {
    SkillDefinition {
        name: name.into(),
        max_level: 5,
        mana_cost: LinearU32::ZERO,
        cast_time_ms: LinearU32::ZERO,
        cooldown_ms: LinearU32::ZERO,
        cast_range: LinearF32::fixed(range),
        effect,
        ammo: None,
        cancel_cast_if_target_died: false,
        followup_default_attack: false,
    }
}

fn damage(base: u32, per_level: u32, stun_ms: u32) -> SkillEffect {
    SkillEffect::TargetDamage {
        damage: LinearU32::new(base, per_level),
        stun_ms: LinearU32::fixed(stun_ms),
    }
}

fn skill_set() -> Vec<SkillDefinition> {
    vec![
        SkillDefinition {
            max_level: 3,
            cast_time_ms: LinearU32::fixed(1_000),
            cooldown_ms: LinearU32::fixed(500),
            cancel_cast_if_target_died: true,
            followup_default_attack: true,
            ..skill("Strike", 2.0, damage(37, 5, 0))
        },
        SkillDefinition {
            mana_cost: LinearU32::new(20, 5),
            cast_time_ms: LinearU32::fixed(1_500),
            cooldown_ms: LinearU32::fixed(3_000),
            followup_default_attack: true,
            ..skill("Fireball", 10.0, damage(40, 10, 0))
        },
        SkillDefinition {
            mana_cost: LinearU32::fixed(10),
            cast_time_ms: LinearU32::fixed(500),
            cooldown_ms: LinearU32::fixed(2_000),
            ..skill("Bash", 2.0, damage(10, 0, 2_000))
        },
        SkillDefinition {
            mana_cost: LinearU32::fixed(15),
            cast_time_ms: LinearU32::fixed(1_000),
            cooldown_ms: LinearU32::fixed(1_000),
            ..skill(
                "Heal",
                8.0,
                SkillEffect::TargetHeal {
                    health: LinearU32::new(50, 10),
                    mana: LinearU32::ZERO,
                },
            )
        },
        SkillDefinition {
            mana_cost: LinearU32::fixed(10),
            cooldown_ms: LinearU32::fixed(10_000),
            ..skill(
                "Fortify",
                0.0,
                SkillEffect::SelfBuff {
                    buff: "Fortify".into(),
                },
            )
        },
        SkillDefinition {
            mana_cost: LinearU32::fixed(30),
            cast_time_ms: LinearU32::fixed(1_000),
            cooldown_ms: LinearU32::fixed(5_000),
            ..skill(
                "Nova",
                0.0,
                SkillEffect::AreaDamage {
                    damage: LinearU32::fixed(25),
                    radius: LinearF32::fixed(5.0),
                },
            )
        },
        SkillDefinition {
            cast_time_ms: LinearU32::fixed(500),
            cooldown_ms: LinearU32::fixed(500),
            ammo: Some(AmmoCost {
                item: "Arrow".into(),
                amount: 1,
            }),
            ..skill("Shoot", 15.0, damage(20, 0, 0))
        },
    ]
}

fn buff(name: &str, duration_ms: u32, remain_after_death: bool) -> BuffDefinition {
    BuffDefinition {
        name: name.into(),
        duration_ms: LinearU32::fixed(duration_ms),
        health_max_bonus: LinearU32::ZERO,
        mana_max_bonus: LinearU32::ZERO,
        damage_bonus: LinearU32::ZERO,
        defense_bonus: LinearU32::ZERO,
        remain_after_death,
    }
}

fn item(name: &str, category: ItemCategory, max_stack: u16, buy: u64, sell: u64) -> ItemDefinition {
    ItemDefinition {
        name: name.into(),
        category,
        max_stack,
        buy_price: buy,
        sell_price: sell,
        sellable: true,
        destroyable: true,
        min_level: 0,
        bonuses: ItemBonuses::default(),
        usage: None,
    }
}

fn template(name: &str, kind: ActorCategory, base: BaseStats, skills: &[&str]) -> ActorTemplate {
    ActorTemplate {
        name: name.into(),
        kind,
        base,
        skills: skills
            .iter()
            .map(|name| TemplateSkill {
                name: (*name).into(),
                level: 1,
            })
            .collect(),
        loot_gold: 0,
        loot_items: Vec::new(),
        respawn_ms: None,
        shop: Vec::new(),
        starting_items: Vec::new(),
        starting_gold: 0,
    }
}

pub fn content() -> ContentSnapshot {
    let buffs = vec![
        BuffDefinition {
            health_max_bonus: LinearU32::new(30, 10),
            ..buff("Fortify", 10_000, false)
        },
        buff("Offender", 60_000, true),
        buff("Murderer", 300_000, true),
        buff("Haste", 5_000, false),
    ];

    let items = vec![
        ItemDefinition {
            bonuses: ItemBonuses {
                health_max: 20,
                defense: 3,
                ..Default::default()
            },
            ..item("Leather Vest", ItemCategory::Chest, 1, 50, 20)
        },
        ItemDefinition {
            bonuses: ItemBonuses {
                damage: 10,
                ..Default::default()
            },
            ..item("Iron Sword", ItemCategory::Weapon, 1, 100, 40)
        },
        ItemDefinition {
            usage: Some(ItemUsage::Restore {
                health: 50,
                mana: 0,
            }),
            ..item("Health Potion", ItemCategory::Potion, 20, 10, 4)
        },
        item("Arrow", ItemCategory::Ammo, 50, 1, 0),
        ItemDefinition {
            sellable: false,
            destroyable: false,
            ..item("Quest Token", ItemCategory::Material, 1, 0, 0)
        },
    ];

    let templates = vec![
        ActorTemplate {
            starting_items: vec![ItemStack::new("Health Potion", 3)],
            starting_gold: 100,
            ..template(
                "Warrior",
                ActorCategory::Player,
                BaseStats {
                    health_max: 100,
                    health_per_level: 10,
                    mana_max: 50,
                    mana_per_level: 5,
                    damage: 5,
                    damage_per_level: 1,
                    defense: 2,
                    speed: 5.0,
                },
                &["Strike", "Fireball", "Bash", "Heal", "Fortify", "Nova", "Shoot"],
            )
        },
        ActorTemplate {
            loot_gold: 25,
            loot_items: vec![ItemStack::new("Health Potion", 1)],
            respawn_ms: Some(10_000),
            ..template(
                "Goblin",
                ActorCategory::Monster,
                BaseStats {
                    health_max: 60,
                    damage: 8,
                    defense: 1,
                    speed: 3.0,
                    ..Default::default()
                },
                &["Strike"],
            )
        },
        ActorTemplate {
            shop: vec!["Health Potion".into(), "Iron Sword".into(), "Arrow".into()],
            ..template(
                "Merchant",
                ActorCategory::Npc,
                BaseStats {
                    health_max: 1_000,
                    ..Default::default()
                },
                &[],
            )
        },
        template(
            "Wolf",
            ActorCategory::Pet,
            BaseStats {
                health_max: 80,
                damage: 6,
                speed: 6.0,
                ..Default::default()
            },
            &["Strike"],
        ),
        template(
            "Horse",
            ActorCategory::Mount,
            BaseStats {
                health_max: 120,
                speed: 8.0,
                ..Default::default()
            },
            &[],
        ),
    ];

    ContentSnapshot::new(skill_set(), buffs, items, templates, WorldRules::default())
}

pub fn env(content: &ContentSnapshot) -> GameEnv<'_> {
    GameEnv::with_all(content, content, content, content, &AGENT)
}

pub fn world() -> WorldState {
    let mut world = WorldState::new();
    world.set_time(WorldTime(10_000));
    world
}

pub fn spawn_player(world: &mut WorldState, env: &GameEnv<'_>, name: &str) -> ActorId {
    spawn::spawn_player(world, env, "Warrior", name, Position::ORIGIN).expect("spawn player")
}

pub fn spawn_monster(world: &mut WorldState, env: &GameEnv<'_>, position: Position) -> ActorId {
    spawn::spawn(world, env, "Goblin", position, None).expect("spawn goblin")
}

pub fn spawn_npc(world: &mut WorldState, env: &GameEnv<'_>, position: Position) -> ActorId {
    spawn::spawn(world, env, "Merchant", position, None).expect("spawn merchant")
}

pub fn spawn_pet(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    owner: ActorId,
    position: Position,
) -> ActorId {
    spawn::spawn(world, env, "Wolf", position, Some(owner)).expect("spawn wolf")
}
