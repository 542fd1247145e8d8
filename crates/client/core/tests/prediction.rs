//! Prediction against a live engine using the bundled content.

use realm_client::{Correction, PendingAction, PredictionConfig, Predictor};
use realm_content::ContentFactory;
use realm_core::{
    ActorId, BehaviorState, Command, ContentSnapshot, GameEnv, HookRegistry, Position, Request,
    StraightLineAgent, Velocity, WorldEngine, WorldSnapshot, WorldState,
};

const TICK_MS: u64 = 50;
const STRIKE: usize = 0;
const SHIELD_BASH: usize = 1;

static AGENT: StraightLineAgent = StraightLineAgent;

fn env(content: &ContentSnapshot) -> GameEnv<'_> {
    GameEnv::with_all(content, content, content, content, &AGENT)
}

struct Harness {
    content: ContentSnapshot,
    hooks: HookRegistry,
    world: WorldState,
    /// Every command the predictor sent, in order.
    sent: Vec<Command>,
}

impl Harness {
    fn new() -> Self {
        Self {
            content: ContentFactory::bundled().load_all().unwrap(),
            hooks: HookRegistry::with_defaults(),
            world: WorldState::new(),
            sent: Vec::new(),
        }
    }

    fn player(&mut self, name: &str, at: Position) -> ActorId {
        let env = env(&self.content);
        WorldEngine::new(&mut self.world, &self.hooks)
            .spawn_player(&env, "Warrior", name, at)
            .unwrap()
    }

    fn goblin(&mut self, at: Position) -> ActorId {
        let env = env(&self.content);
        WorldEngine::new(&mut self.world, &self.hooks)
            .spawn(&env, "Goblin", at, None)
            .unwrap()
    }

    fn submit(&mut self, id: ActorId, command: Command) {
        let env = env(&self.content);
        WorldEngine::new(&mut self.world, &self.hooks).submit(&env, &Request::own(id, command));
    }

    fn tick(&mut self) -> WorldSnapshot {
        let env = env(&self.content);
        let now = self.world.time() + TICK_MS;
        WorldEngine::new(&mut self.world, &self.hooks).tick(&env, now);
        WorldSnapshot::capture(&self.world, &env)
    }

    /// Delivers queued commands, ticks once and reconciles.
    fn step(&mut self, predictor: &mut Predictor, outbox: &mut Vec<Command>) -> (WorldSnapshot, Correction) {
        for command in outbox.drain(..) {
            self.submit(predictor.actor(), command.clone());
            self.sent.push(command);
        }
        let snapshot = self.tick();
        let env = env(&self.content);
        let correction = predictor.on_snapshot(&snapshot, &env, outbox);
        predictor.advance(&env, TICK_MS);
        (snapshot, correction)
    }

    fn use_skill(&mut self, predictor: &mut Predictor, index: usize, outbox: &mut Vec<Command>) -> Correction {
        let env = env(&self.content);
        let snapshot = WorldSnapshot::capture(&self.world, &env);
        predictor.use_skill(index, &snapshot, &env, outbox)
    }
}

fn casts(sent: &[Command]) -> usize {
    sent.iter()
        .filter(|command| matches!(command, Command::UseSkill { .. }))
        .count()
}

#[test]
fn moving_actor_approaches_and_casts_once_in_range() {
    let mut h = Harness::new();
    let alice = h.player("alice", Position::ORIGIN);
    let goblin = h.goblin(Position::new(5.0, 0.0));
    h.submit(alice, Command::SetTarget { target: Some(goblin) });

    let mut predictor = Predictor::new(alice, PredictionConfig::default());
    let mut outbox = Vec::new();
    h.step(&mut predictor, &mut outbox);

    predictor.move_to(Position::new(0.0, 4.0), &mut outbox);
    let (snapshot, _) = h.step(&mut predictor, &mut outbox);
    assert_eq!(snapshot.actor(alice).unwrap().state, BehaviorState::Moving);

    // Strike reaches 2 units; the goblin is about 5 away.
    let correction = h.use_skill(&mut predictor, STRIKE, &mut outbox);
    assert_eq!(correction, Correction::APPROACHING);
    assert!(matches!(outbox.as_slice(), [Command::Move { .. }]));
    assert!(predictor.intent().is_some());

    let mut casting = None;
    for _ in 0..40 {
        let (snapshot, _) = h.step(&mut predictor, &mut outbox);
        if snapshot.actor(alice).unwrap().state == BehaviorState::Casting {
            casting = Some(snapshot);
            break;
        }
    }
    let snapshot = casting.expect("alice never started casting");

    let me = snapshot.actor(alice).unwrap();
    let target = snapshot.actor(goblin).unwrap();
    assert!(me.position.distance(target.position) <= 2.0);
    assert_eq!(me.current_skill, Some(STRIKE));
    assert_eq!(casts(&h.sent), 1);
    assert!(predictor.intent().is_none());
}

#[test]
fn input_during_a_cast_is_queued_and_drained_once() {
    let mut h = Harness::new();
    let alice = h.player("alice", Position::ORIGIN);
    let goblin = h.goblin(Position::new(1.0, 0.0));
    h.submit(alice, Command::SetTarget { target: Some(goblin) });

    let mut predictor = Predictor::new(alice, PredictionConfig::default());
    let mut outbox = Vec::new();
    h.step(&mut predictor, &mut outbox);

    assert_eq!(h.use_skill(&mut predictor, STRIKE, &mut outbox), Correction::CAST_SENT);
    let (snapshot, _) = h.step(&mut predictor, &mut outbox);
    assert_eq!(snapshot.actor(alice).unwrap().state, BehaviorState::Casting);

    // Last write wins; nothing leaves the client while casting.
    h.use_skill(&mut predictor, SHIELD_BASH, &mut outbox);
    let retreat = Position::new(0.0, -5.0);
    predictor.move_to(retreat, &mut outbox);
    assert!(outbox.is_empty());
    assert_eq!(predictor.pending(), Some(PendingAction::Destination(retreat)));

    let mut drained = None;
    for _ in 0..30 {
        let (snapshot, correction) = h.step(&mut predictor, &mut outbox);
        if correction.contains(Correction::DRAINED) {
            drained = Some((snapshot, correction));
            break;
        }
    }
    let (snapshot, correction) = drained.expect("pending action never drained");

    // The destination pre-empts Strike's follow-up attack.
    assert!(!correction.contains(Correction::FOLLOW_UP));
    assert_eq!(outbox, vec![Command::Move { destination: retreat }]);
    assert_eq!(predictor.pending(), None);
    let target = snapshot.actor(goblin).unwrap();
    // 6 base damage + 12 Strike - 1 goblin defense.
    assert_eq!(target.health, target.health_max - 17);
}

#[test]
fn a_cast_cancelled_by_the_server_drops_the_queued_action() {
    let mut h = Harness::new();
    let alice = h.player("alice", Position::ORIGIN);
    let goblin = h.goblin(Position::new(1.0, 0.0));
    h.submit(alice, Command::SetTarget { target: Some(goblin) });

    let mut predictor = Predictor::new(alice, PredictionConfig::default());
    let mut outbox = Vec::new();
    h.step(&mut predictor, &mut outbox);
    h.use_skill(&mut predictor, STRIKE, &mut outbox);
    let (snapshot, _) = h.step(&mut predictor, &mut outbox);
    assert_eq!(snapshot.actor(alice).unwrap().state, BehaviorState::Casting);

    let retreat = Position::new(0.0, -5.0);
    predictor.move_to(retreat, &mut outbox);
    assert_eq!(predictor.pending(), Some(PendingAction::Destination(retreat)));

    // Strike aborts when its target dies mid-cast.
    h.world.actor_mut(goblin).unwrap().health = 0;
    let (snapshot, correction) = h.step(&mut predictor, &mut outbox);
    let me = snapshot.actor(alice).unwrap();
    assert_eq!(me.state, BehaviorState::Idle);
    assert_eq!(me.casts_completed, 0);
    assert!(!correction.contains(Correction::DRAINED));
    assert_eq!(predictor.pending(), None);
    assert!(outbox.is_empty());

    let elsewhere = Position::new(3.0, 3.0);
    predictor.move_to(elsewhere, &mut outbox);
    assert_eq!(outbox, vec![Command::Move { destination: elsewhere }]);
    assert_eq!(predictor.pending(), None);

    for _ in 0..10 {
        h.step(&mut predictor, &mut outbox);
    }
    assert!(!h.sent.contains(&Command::Move { destination: retreat }));
}

#[test]
fn cancel_stops_the_walk_on_the_server_too() {
    let mut h = Harness::new();
    let alice = h.player("alice", Position::ORIGIN);

    let mut predictor = Predictor::new(alice, PredictionConfig::default());
    let mut outbox = Vec::new();
    h.step(&mut predictor, &mut outbox);
    predictor.move_to(Position::new(0.0, 20.0), &mut outbox);
    h.step(&mut predictor, &mut outbox);
    let (snapshot, _) = h.step(&mut predictor, &mut outbox);
    assert_eq!(snapshot.actor(alice).unwrap().state, BehaviorState::Moving);

    predictor.cancel(&mut outbox);
    assert_eq!(
        outbox,
        vec![Command::Steer { velocity: Velocity::ZERO }, Command::CancelAction]
    );

    let (stopped, _) = h.step(&mut predictor, &mut outbox);
    let at = stopped.actor(alice).unwrap().position;
    for _ in 0..10 {
        let (snapshot, correction) = h.step(&mut predictor, &mut outbox);
        let me = snapshot.actor(alice).unwrap();
        assert!(!correction.contains(Correction::SNAPPED));
        assert_eq!(me.state, BehaviorState::Idle);
        assert!(!me.motion.is_moving());
        assert_eq!(me.position, at);
    }
    assert_eq!(predictor.position(), Some(at));
}

#[test]
fn default_attack_follows_up_once_the_cooldown_ends() {
    let mut h = Harness::new();
    let alice = h.player("alice", Position::ORIGIN);
    let goblin = h.goblin(Position::new(1.0, 0.0));
    h.submit(alice, Command::SetTarget { target: Some(goblin) });

    let mut predictor = Predictor::new(alice, PredictionConfig::default());
    let mut outbox = Vec::new();
    h.step(&mut predictor, &mut outbox);
    h.use_skill(&mut predictor, STRIKE, &mut outbox);

    let mut follow_ups = 0;
    let mut last = None;
    for _ in 0..(3_000 / TICK_MS) {
        let (snapshot, correction) = h.step(&mut predictor, &mut outbox);
        if correction.contains(Correction::FOLLOW_UP) {
            follow_ups += 1;
        }
        last = Some(snapshot);
    }
    let snapshot = last.unwrap();
    let me = snapshot.actor(alice).unwrap();
    let target = snapshot.actor(goblin).unwrap();

    assert!(me.casts_completed >= 2);
    assert_eq!(follow_ups as u64, me.casts_completed);
    assert!(h.sent.iter().all(|command| *command == Command::UseSkill { index: STRIKE }));
    assert_eq!(target.health, target.health_max - 17 * me.casts_completed as u32);
}

#[test]
fn a_stun_discards_all_prediction() {
    let mut h = Harness::new();
    let alice = h.player("alice", Position::ORIGIN);
    let bob = h.player("bob", Position::new(1.0, 0.0));
    let goblin = h.goblin(Position::new(20.0, 0.0));
    h.submit(alice, Command::SetTarget { target: Some(goblin) });

    let mut predictor = Predictor::new(alice, PredictionConfig::default());
    let mut outbox = Vec::new();
    h.step(&mut predictor, &mut outbox);
    assert_eq!(h.use_skill(&mut predictor, STRIKE, &mut outbox), Correction::APPROACHING);

    h.submit(bob, Command::SetTarget { target: Some(alice) });
    h.submit(bob, Command::UseSkill { index: SHIELD_BASH });

    let mut discarded = false;
    for _ in 0..20 {
        let (snapshot, correction) = h.step(&mut predictor, &mut outbox);
        if snapshot.actor(alice).unwrap().state == BehaviorState::Stunned {
            discarded = correction.contains(Correction::DISCARDED);
            break;
        }
    }

    assert!(discarded);
    assert!(predictor.intent().is_none());
    assert!(!predictor.motion().is_moving());
    assert_eq!(predictor.position(), Some(predictor.server_state().unwrap().position));
}
