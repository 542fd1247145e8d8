//! Prediction for the local player's own actor.
//!
//! # Architecture
//!
//! - Input methods ([`Predictor::move_to`], [`Predictor::steer`],
//!   [`Predictor::use_skill`]) send commands right away unless the actor is
//!   blocked, in which case they fill the single [`PendingAction`] slot.
//! - [`Predictor::on_snapshot`] reconciles against the server: it snaps a
//!   drifting position, discards everything on `DEAD`/`STUNNED`, drains the
//!   pending slot when a cast completes (or drops it when the cast ended
//!   any other way) and advances the skill intent.
//! - [`Predictor::advance`] moves the predicted position between snapshots
//!   with the same movement agent the server uses.
//!
//! The predictor only reads snapshots; its own fields are the prediction.

use bitflags::bitflags;
use tracing::{debug, trace};

use realm_core::{
    ActorId, ActorSnapshot, BehaviorState, Command, GameConfig, GameEnv, Motion, Position, Velocity,
    WorldSnapshot,
};

use crate::config::PredictionConfig;
use crate::intent::{IntentStep, SkillIntent};
use crate::pending::PendingAction;
use crate::sink::CommandSink;

bitflags! {
    /// What a reconciliation pass changed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Correction: u8 {
        /// Predicted position snapped to the server position.
        const SNAPPED        = 0b0000_0001;
        /// All prediction state discarded.
        const DISCARDED      = 0b0000_0010;
        /// A completed cast drained the pending action.
        const DRAINED        = 0b0000_0100;
        /// A completed cast chained into the default attack.
        const FOLLOW_UP      = 0b0000_1000;
        /// A `UseSkill` command was sent.
        const CAST_SENT      = 0b0001_0000;
        /// A new approach point was sent.
        const APPROACHING    = 0b0010_0000;
        /// The skill intent can no longer succeed and was dropped.
        const INTENT_DROPPED = 0b0100_0000;
    }
}

#[derive(Debug)]
pub struct Predictor {
    actor: ActorId,
    config: PredictionConfig,
    /// Latest authoritative view of the local actor.
    server: Option<ActorSnapshot>,
    predicted: Option<Position>,
    motion: Motion,
    pending: Option<PendingAction>,
    intent: Option<SkillIntent>,
    /// A `UseSkill` was sent and no snapshot has answered it yet.
    cast_in_flight: bool,
    casts_seen: Option<u64>,
}

impl Predictor {
    pub fn new(actor: ActorId, config: PredictionConfig) -> Self {
        Self {
            actor,
            config,
            server: None,
            predicted: None,
            motion: Motion::Idle,
            pending: None,
            intent: None,
            cast_in_flight: false,
            casts_seen: None,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Position to render: predicted when available, otherwise the server's.
    pub fn position(&self) -> Option<Position> {
        self.predicted
            .or_else(|| self.server.as_ref().map(|me| me.position))
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn intent(&self) -> Option<&SkillIntent> {
        self.intent.as_ref()
    }

    /// Latest authoritative state of the local actor.
    pub fn server_state(&self) -> Option<&ActorSnapshot> {
        self.server.as_ref()
    }

    /// Whether local input is queued instead of sent.
    pub fn is_blocked(&self) -> bool {
        self.cast_in_flight
            || self
                .server
                .as_ref()
                .is_some_and(|me| me.state.is_blocking())
    }

    fn accepts_input(&self) -> bool {
        self.server.as_ref().is_some_and(|me| me.state.is_active())
    }

    pub fn move_to(&mut self, destination: Position, sink: &mut impl CommandSink) {
        self.input(PendingAction::Destination(destination), sink);
    }

    pub fn steer(&mut self, velocity: Velocity, sink: &mut impl CommandSink) {
        self.input(PendingAction::Velocity(velocity), sink);
    }

    fn input(&mut self, action: PendingAction, sink: &mut impl CommandSink) {
        if !self.accepts_input() {
            return;
        }
        if self.is_blocked() {
            self.queue(action);
            return;
        }
        self.pending = None;
        self.intent = None;
        self.start_movement(action, sink);
    }

    /// Requests skill `index` against the current target. Out of range or
    /// cooling down, the request becomes a skill intent.
    pub fn use_skill(
        &mut self,
        index: usize,
        world: &WorldSnapshot,
        env: &GameEnv<'_>,
        sink: &mut impl CommandSink,
    ) -> Correction {
        if !self.accepts_input() {
            return Correction::empty();
        }
        if self.is_blocked() {
            self.queue(PendingAction::Skill(index));
            return Correction::empty();
        }
        self.begin_intent(index, world, env, sink)
    }

    /// Clears all local intent and asks the server to cancel. A moving actor
    /// is also told to stop, since cancelling leaves server motion alone.
    pub fn cancel(&mut self, sink: &mut impl CommandSink) {
        let moving = self.motion.is_moving()
            || self.server.as_ref().is_some_and(|me| me.motion.is_moving());
        self.pending = None;
        self.intent = None;
        self.motion = Motion::Idle;
        if moving {
            sink.send(Command::Steer {
                velocity: Velocity::ZERO,
            });
        }
        sink.send(Command::CancelAction);
    }

    /// Advances the predicted position by `elapsed_ms` and returns it.
    pub fn advance(&mut self, env: &GameEnv<'_>, elapsed_ms: u64) -> Option<Position> {
        let (Some(from), Some(me)) = (self.predicted, self.server.as_ref()) else {
            return self.position();
        };
        if !me.state.is_active() || !self.motion.is_moving() {
            return Some(from);
        }
        let Ok(agent) = env.movement() else {
            return Some(from);
        };
        let (position, motion) = agent.advance(from, self.motion, me.speed, elapsed_ms);
        if position.is_finite() {
            self.predicted = Some(position);
            self.motion = motion;
        }
        self.predicted
    }

    /// Reconciles the prediction with a new authoritative snapshot and
    /// sends whatever the reconciliation decides.
    pub fn on_snapshot(
        &mut self,
        world: &WorldSnapshot,
        env: &GameEnv<'_>,
        sink: &mut impl CommandSink,
    ) -> Correction {
        let Some(me) = world.actor(self.actor) else {
            let known = self.server.is_some();
            self.discard();
            self.server = None;
            self.predicted = None;
            self.casts_seen = None;
            return if known {
                Correction::DISCARDED
            } else {
                Correction::empty()
            };
        };

        // The server has seen every command sent before this snapshot.
        self.cast_in_flight = false;
        let completed = self
            .casts_seen
            .is_some_and(|seen| me.casts_completed > seen);
        self.casts_seen = Some(me.casts_completed);
        self.server = Some(me.clone());

        if matches!(me.state, BehaviorState::Dead | BehaviorState::Stunned) {
            let mut correction = Correction::empty();
            if self.has_prediction() {
                debug!(actor = %self.actor, state = ?me.state, "prediction discarded");
                correction |= Correction::DISCARDED;
            }
            self.discard();
            self.predicted = Some(me.position);
            return correction;
        }

        let mut correction = self.rubberband(me);
        if !me.state.is_blocking() {
            if completed {
                correction |= self.drain(me, world, env, sink);
            } else if let Some(action) = self.pending.take() {
                // The cast was cancelled or refused; nothing is left to follow.
                debug!(actor = %self.actor, ?action, "pending action dropped");
            }
        }
        if !self.is_blocked() {
            correction |= self.pursue(me, world, env, sink);
        }
        correction
    }

    fn queue(&mut self, action: PendingAction) {
        trace!(actor = %self.actor, ?action, "input queued while casting");
        self.pending = Some(action);
    }

    fn start_movement(&mut self, action: PendingAction, sink: &mut impl CommandSink) {
        let Some((motion, command)) = action.movement() else {
            return;
        };
        self.motion = if motion.is_moving() {
            motion
        } else {
            Motion::Idle
        };
        sink.send(command);
    }

    fn has_prediction(&self) -> bool {
        self.pending.is_some()
            || self.intent.is_some()
            || self.cast_in_flight
            || self.motion.is_moving()
    }

    fn discard(&mut self) {
        self.pending = None;
        self.intent = None;
        self.cast_in_flight = false;
        self.motion = Motion::Idle;
    }

    fn rubberband(&mut self, me: &ActorSnapshot) -> Correction {
        let Some(predicted) = self.predicted else {
            self.predicted = Some(me.position);
            return Correction::empty();
        };
        let error = predicted.distance(me.position);
        if error > self.config.rubberband_threshold {
            debug!(actor = %self.actor, error, "predicted position snapped to server");
            self.predicted = Some(me.position);
            return Correction::SNAPPED;
        }
        // Both sides at rest: settle on the server position.
        if !self.motion.is_moving() && !me.motion.is_moving() {
            self.predicted = Some(me.position);
        }
        Correction::empty()
    }

    /// Applies exactly one follow-up after a completed cast: the pending
    /// action if any, otherwise the finished skill's default-attack chain.
    fn drain(
        &mut self,
        me: &ActorSnapshot,
        world: &WorldSnapshot,
        env: &GameEnv<'_>,
        sink: &mut impl CommandSink,
    ) -> Correction {
        match self.pending.take() {
            Some(PendingAction::Skill(index)) => {
                Correction::DRAINED | self.begin_intent(index, world, env, sink)
            }
            Some(action) => {
                self.intent = None;
                self.start_movement(action, sink);
                Correction::DRAINED
            }
            None => {
                let chains = me
                    .last_finished_skill
                    .and_then(|index| me.skills.get(index))
                    .and_then(|skill| env.skill(&skill.name).ok())
                    .is_some_and(|def| def.followup_default_attack);
                if chains && self.intent.is_none() {
                    Correction::FOLLOW_UP
                        | self.begin_intent(GameConfig::DEFAULT_ATTACK, world, env, sink)
                } else {
                    Correction::empty()
                }
            }
        }
    }

    fn begin_intent(
        &mut self,
        index: usize,
        world: &WorldSnapshot,
        env: &GameEnv<'_>,
        sink: &mut impl CommandSink,
    ) -> Correction {
        let Some(me) = world.actor(self.actor) else {
            return Correction::empty();
        };
        self.pending = None;
        self.intent = Some(SkillIntent::new(index, me.target));
        self.pursue(me, world, env, sink)
    }

    fn pursue(
        &mut self,
        me: &ActorSnapshot,
        world: &WorldSnapshot,
        env: &GameEnv<'_>,
        sink: &mut impl CommandSink,
    ) -> Correction {
        let Some(mut intent) = self.intent else {
            return Correction::empty();
        };
        match intent.evaluate(me, world, env) {
            IntentStep::Cast => {
                self.intent = None;
                self.cast_in_flight = true;
                sink.send(Command::UseSkill {
                    index: intent.skill,
                });
                Correction::CAST_SENT
            }
            IntentStep::Approach(point) => {
                if intent
                    .destination
                    .is_some_and(|last| last.distance(point) <= self.config.approach_tolerance)
                {
                    return Correction::empty();
                }
                intent.destination = Some(point);
                self.intent = Some(intent);
                self.motion = Motion::Destination(point);
                sink.send(Command::Move { destination: point });
                Correction::APPROACHING
            }
            IntentStep::Wait => Correction::empty(),
            IntentStep::Drop(reason) => {
                debug!(actor = %self.actor, skill = intent.skill, reason, "skill intent dropped");
                self.intent = None;
                Correction::INTENT_DROPPED
            }
        }
    }
}
