//! Building actor records from templates.
//!
//! Spawned actors start at level 1 with full health and mana. Companions are
//! linked to their owner in both directions.

use tracing::debug;

use crate::config::GameConfig;
use crate::env::{ActorTemplate, GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    ActorCategory, ActorId, ActorKind, ActorRecord, CompanionData, MonsterData, NpcData,
    PlayerData, Position, Skill, WorldState,
};
use crate::stats::fill_resources;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SpawnError {
    #[error("template '{0}' describes a companion and needs an owner")]
    MissingOwner(String),

    #[error("owner {0} is not an online player")]
    OwnerNotFound(ActorId),

    #[error("template '{0}' is not a player template")]
    NotAPlayerTemplate(String),

    #[error("invalid player name '{0}'")]
    InvalidName(String),

    #[error("player '{0}' is already online")]
    AlreadyOnline(String),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidName(_) | Self::AlreadyOnline(_) => ErrorSeverity::Validation,
            Self::Oracle(err) => err.severity(),
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingOwner(_) => "SPAWN_MISSING_OWNER",
            Self::OwnerNotFound(_) => "SPAWN_OWNER_NOT_FOUND",
            Self::NotAPlayerTemplate(_) => "SPAWN_NOT_A_PLAYER_TEMPLATE",
            Self::InvalidName(_) => "SPAWN_INVALID_NAME",
            Self::AlreadyOnline(_) => "SPAWN_ALREADY_ONLINE",
            Self::Oracle(err) => err.error_code(),
        }
    }
}

/// Player names are 1 to [`GameConfig::MAX_NAME_LEN`] alphanumeric characters.
pub fn is_valid_name(name: &str) -> bool {
    let len = name.chars().count();
    (1..=GameConfig::MAX_NAME_LEN).contains(&len) && name.chars().all(char::is_alphanumeric)
}

fn skills_of(template: &ActorTemplate) -> Vec<Skill> {
    template
        .skills
        .iter()
        .take(GameConfig::MAX_SKILLS)
        .map(|skill| Skill::new(skill.name.clone(), skill.level))
        .collect()
}

/// Creates and inserts a non-player actor from `template` at `position`.
pub fn spawn(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    template: &str,
    position: Position,
    owner: Option<ActorId>,
) -> Result<ActorId, SpawnError> {
    let def = env.template(template)?;
    let name = template.to_string();
    let kind = match def.kind {
        ActorCategory::Player => return Err(SpawnError::NotAPlayerTemplate(name)),
        ActorCategory::Monster => ActorKind::Monster(MonsterData {
            template: name.clone(),
            ..Default::default()
        }),
        ActorCategory::Npc => ActorKind::Npc(NpcData {
            template: name.clone(),
            shop: def.shop.iter().take(GameConfig::MAX_SHOP_ITEMS).cloned().collect(),
        }),
        ActorCategory::Pet | ActorCategory::Mount => {
            let owner = owner.ok_or_else(|| SpawnError::MissingOwner(name.clone()))?;
            if !world.actor(owner).is_some_and(|actor| actor.kind.is_player()) {
                return Err(SpawnError::OwnerNotFound(owner));
            }
            let data = CompanionData {
                template: name.clone(),
                owner,
            };
            if def.kind == ActorCategory::Pet {
                ActorKind::Pet(data)
            } else {
                ActorKind::Mount(data)
            }
        }
    };

    let id = world.allocate_id();
    let mut actor = ActorRecord::new(id, name, kind, 1, def.base, position);
    actor.skills = skills_of(def);
    fill_resources(&mut actor, env, world.time());

    if let Some(owner) = actor.kind.owner()
        && let Some(player) = world.actor_mut(owner).and_then(ActorRecord::player_mut)
    {
        match def.kind {
            ActorCategory::Pet => player.pet = Some(id),
            _ => player.mount = Some(id),
        }
    }
    world.insert(actor);
    debug!(target: "realm::spawn", actor = %id, template, "spawned");
    Ok(id)
}

/// Creates a fresh player character from a class template.
pub fn spawn_player(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    template: &str,
    name: &str,
    position: Position,
) -> Result<ActorId, SpawnError> {
    let actor = new_player(world, env, template, name, position)?;
    let id = actor.id;
    world.insert(actor);
    debug!(target: "realm::spawn", actor = %id, name, "player spawned");
    Ok(id)
}

/// Builds, without inserting, a fresh player record with the template's
/// starting kit. Persistence restores on top of this record.
pub fn new_player(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    template: &str,
    name: &str,
    position: Position,
) -> Result<ActorRecord, SpawnError> {
    if !is_valid_name(name) {
        return Err(SpawnError::InvalidName(name.to_string()));
    }
    if world.player_id(name).is_some() {
        return Err(SpawnError::AlreadyOnline(name.to_string()));
    }
    let def = env.template(template)?;
    if def.kind != ActorCategory::Player {
        return Err(SpawnError::NotAPlayerTemplate(template.to_string()));
    }

    let mut data = PlayerData {
        template: template.to_string(),
        ..Default::default()
    };
    for stack in &def.starting_items {
        let max_stack = env.item(&stack.item)?.max_stack;
        data.inventory.add(&stack.item, stack.amount, max_stack);
    }

    let id = world.allocate_id();
    let mut actor = ActorRecord::new(
        id,
        name.to_string(),
        ActorKind::Player(Box::new(data)),
        1,
        def.base,
        position,
    );
    actor.skills = skills_of(def);
    actor.gold = def.starting_gold;
    fill_resources(&mut actor, env, world.time());
    Ok(actor)
}
