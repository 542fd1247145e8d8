//! The command gate: state allow-list, ownership, then per-command checks.
//!
//! Each handler validates everything before touching state, so a rejected
//! command leaves the world exactly as it was.

use tracing::{debug, warn};

use super::{Command, CommandRejection, Request, inventory, trade};
use crate::env::GameEnv;
use crate::error::GameError;
use crate::state::{ActorId, ActorRecord, BehaviorState, Motion, WorldState};

/// Whether `command` may be issued while the subject is in `state`.
pub fn allowed_in(command: &Command, state: BehaviorState) -> bool {
    match command {
        Command::Respawn => state == BehaviorState::Dead,
        Command::SetTarget { .. } => state != BehaviorState::Dead,
        Command::ToggleMount => matches!(state, BehaviorState::Idle | BehaviorState::Moving),
        _ => state.is_active(),
    }
}

/// Validates and applies `request`. Rejections are logged, at warn level when
/// they point at an inconsistency, and otherwise dropped. Returns whether the command was applied.
pub fn handle(world: &mut WorldState, env: &GameEnv<'_>, request: &Request) -> bool {
    match try_handle(world, env, request) {
        Ok(()) => true,
        Err(rejection) => {
            let (sender, subject, command) =
                (request.sender, request.subject, request.command.name());
            let (code, severity) = (rejection.error_code(), rejection.severity());
            if severity.is_internal() {
                warn!(target: "realm::gate", %sender, %subject, command, code, severity = severity.as_str(), reason = %rejection, "command rejected");
            } else {
                debug!(target: "realm::gate", %sender, %subject, command, code, severity = severity.as_str(), reason = %rejection, "command rejected");
            }
            false
        }
    }
}

/// Validates and applies `request`, reporting why it was rejected.
pub fn try_handle(
    world: &mut WorldState,
    env: &GameEnv<'_>,
    request: &Request,
) -> Result<(), CommandRejection> {
    let subject = world
        .actor(request.subject)
        .ok_or(CommandRejection::SubjectNotFound(request.subject))?;
    authorize(request, subject)?;

    let state = subject.state;
    if !allowed_in(&request.command, state) {
        return Err(CommandRejection::StateNotAllowed {
            command: request.command.name(),
            state,
        });
    }

    let id = request.subject;
    match &request.command {
        Command::Move { destination } => {
            let limit = env.rules()?.max_move_distance;
            let actor = subject_mut(world, request)?;
            if !destination.is_finite() {
                return Err(CommandRejection::InvalidMotion);
            }
            let distance = actor.position.distance(*destination);
            if distance > limit {
                return Err(CommandRejection::DestinationTooFar { distance, limit });
            }
            actor.motion = Motion::Destination(*destination);
            actor.requests.motion = true;
            Ok(())
        }
        Command::Steer { velocity } => {
            let actor = subject_mut(world, request)?;
            if !velocity.is_finite() {
                return Err(CommandRejection::InvalidMotion);
            }
            // Zero stops any movement, destination walks included.
            if velocity.is_zero() {
                actor.motion = Motion::Idle;
                return Ok(());
            }
            // Clamp to the actor's own speed; the client cannot outrun it.
            let speed = actor.base.speed;
            let magnitude = velocity.magnitude();
            let velocity = if magnitude > speed && magnitude > 0.0 {
                let scale = speed / magnitude;
                crate::state::Velocity::new(velocity.x * scale, velocity.y * scale)
            } else {
                *velocity
            };
            actor.motion = Motion::Velocity(velocity);
            actor.requests.motion = true;
            Ok(())
        }
        Command::CancelAction => {
            subject_mut(world, request)?.requests.cancel = true;
            Ok(())
        }
        Command::Respawn => {
            let actor = subject_mut(world, request)?;
            if !actor.kind.is_player() {
                return Err(CommandRejection::NotAPlayer);
            }
            actor.requests.respawn = true;
            Ok(())
        }
        Command::UseSkill { index } => {
            let actor = subject_mut(world, request)?;
            let skill = actor
                .skills
                .get(*index)
                .ok_or(CommandRejection::IndexOutOfBounds {
                    index: *index,
                    len: actor.skills.len(),
                })?;
            if !skill.is_learned() {
                return Err(CommandRejection::SkillNotLearned(skill.name.clone()));
            }
            // While casting this queues behind the current cast.
            actor.skill_request = Some(*index);
            Ok(())
        }
        Command::SetTarget { target } => {
            if let Some(target) = target
                && !world.contains(*target)
            {
                return Err(CommandRejection::TargetNotFound(*target));
            }
            subject_mut(world, request)?.target = *target;
            Ok(())
        }
        Command::UpgradeSkill { index } => {
            let actor = subject_mut(world, request)?;
            let len = actor.skills.len();
            let points = actor
                .player()
                .map(|player| player.skill_points)
                .ok_or(CommandRejection::NotAPlayer)?;
            let skill = actor
                .skills
                .get(*index)
                .ok_or(CommandRejection::IndexOutOfBounds { index: *index, len })?;
            let def = env.skill(&skill.name)?;
            if skill.level >= def.max_level {
                return Err(CommandRejection::SkillMaxed(skill.name.clone()));
            }
            if points == 0 {
                return Err(CommandRejection::NoSkillPoints);
            }
            if let Some(player) = actor.player_mut() {
                player.skill_points -= 1;
            }
            if let Some(skill) = actor.skills.get_mut(*index) {
                skill.level += 1;
            }
            Ok(())
        }
        Command::ToggleMount => toggle_mount(world, env, id),
        Command::SwapInventorySlots { a, b } => inventory::swap(world, id, *a, *b),
        Command::SplitInventorySlot { from, to } => inventory::split(world, id, *from, *to),
        Command::MergeInventorySlot { from, to } => inventory::merge(world, env, id, *from, *to),
        Command::MoveInventoryToTrash { index } => inventory::to_trash(world, env, id, *index),
        Command::MoveTrashToInventory { index } => inventory::from_trash(world, env, id, *index),
        Command::Equip {
            inventory,
            equipment,
        } => inventory::equip(world, env, id, *inventory, *equipment),
        Command::UseInventoryItem { index } => inventory::use_item(world, env, id, *index),
        Command::TakeLootGold => trade::take_loot_gold(world, env, id),
        Command::TakeLootItem { index } => trade::take_loot_item(world, env, id, *index),
        Command::BuyItem { index, amount } => trade::buy(world, env, id, *index, *amount),
        Command::SellItem { index, amount } => trade::sell(world, env, id, *index, *amount),
    }
}

/// Mounts the player's mount when it is alive and within interaction range,
/// or dismounts. Mounting moves the mount under its rider.
fn toggle_mount(world: &mut WorldState, env: &GameEnv<'_>, id: ActorId) -> Result<(), CommandRejection> {
    let range = env.rules()?.interaction_range;
    let rider = world.actor(id).ok_or(CommandRejection::SubjectNotFound(id))?;
    let player = rider.player().ok_or(CommandRejection::NotAPlayer)?;
    let mount_id = player.mount.ok_or(CommandRejection::NoMount)?;
    let (mounted, position) = (player.mounted, rider.position);

    if !mounted {
        let mount = world.actor(mount_id).ok_or(CommandRejection::NoMount)?;
        if !mount.is_alive() {
            return Err(CommandRejection::NoMount);
        }
        if mount.position.distance(position) > range {
            return Err(CommandRejection::OutOfInteractionRange);
        }
        if let Some(mount) = world.actor_mut(mount_id) {
            mount.position = position;
            mount.reset_motion();
        }
    }
    if let Some(player) = world.actor_mut(id).and_then(ActorRecord::player_mut) {
        player.mounted = !mounted;
    }
    Ok(())
}

/// The sender controls the subject: it is the sender, or the sender owns it
/// and the command is one companions accept.
fn authorize(request: &Request, subject: &ActorRecord) -> Result<(), CommandRejection> {
    if request.subject == request.sender {
        return Ok(());
    }
    if subject.kind.owner() != Some(request.sender) {
        return Err(CommandRejection::NotAuthorized {
            sender: request.sender,
            subject: request.subject,
        });
    }
    if !request.command.is_companion_command() {
        return Err(CommandRejection::NotACompanionCommand(request.command.name()));
    }
    Ok(())
}

fn subject_mut<'w>(
    world: &'w mut WorldState,
    request: &Request,
) -> Result<&'w mut ActorRecord, CommandRejection> {
    world
        .actor_mut(request.subject)
        .ok_or(CommandRejection::SubjectNotFound(request.subject))
}
