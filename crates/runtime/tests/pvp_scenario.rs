//! Offender/murderer status through the full runtime.

use std::time::Duration;

use realm_core::{ActorId, BehaviorState, Command, WorldSnapshot};
use realm_runtime::{Event, Runtime, RuntimeConfig, RuntimeHandle, Topic, WorldEvent};

const STRIKE: usize = 0;

async fn strike(handle: &RuntimeHandle, attacker: ActorId, victim: ActorId) {
    handle
        .command(attacker, Command::SetTarget { target: Some(victim) })
        .await
        .unwrap();
    handle
        .command(attacker, Command::UseSkill { index: STRIKE })
        .await
        .unwrap();
    // Strike casts for 800ms and cools down for 400ms after that.
    tokio::time::sleep(Duration::from_millis(1_500)).await;
}

fn has_buff(snapshot: &WorldSnapshot, actor: ActorId, buff: &str) -> bool {
    snapshot
        .actor(actor)
        .is_some_and(|actor| actor.buffs.iter().any(|b| b.name == buff))
}

async fn start() -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::start(RuntimeConfig {
        tick_ms: 50,
        autosave_ticks: 0,
        ..RuntimeConfig::default()
    })
    .await
    .unwrap();
    let handle = runtime.handle();
    (runtime, handle)
}

/// Hitting an innocent player flags the attacker; the victim survives and
/// stays idle.
#[tokio::test(start_paused = true)]
async fn attacking_an_innocent_player_grants_offender() {
    let (runtime, handle) = start().await;
    let alice = handle.login("alice", "Warrior").await.unwrap();
    let bob = handle.login("bob", "Warrior").await.unwrap();
    let mut world = handle.subscribe(Topic::World);

    strike(&handle, alice, bob).await;

    let snapshot = handle.snapshot().await.unwrap();
    let victim = snapshot.actor(bob).unwrap();
    // Base damage 6 + Strike 12 - defense 3.
    assert_eq!(victim.health, victim.health_max - 15);
    assert_eq!(victim.state, BehaviorState::Idle);
    assert!(has_buff(&snapshot, alice, "Offender"));
    assert!(!has_buff(&snapshot, bob, "Offender"));

    let mut damage = Vec::new();
    while let Ok(event) = world.try_recv() {
        if let Event::World(WorldEvent::Damaged { attacker, victim, amount, killed }) = event {
            damage.push((attacker, victim, amount, killed));
        }
    }
    assert_eq!(damage, vec![(alice, bob, 15, false)]);

    runtime.shutdown().await.unwrap();
}

/// An offender is fair game: hitting back carries no status.
#[tokio::test(start_paused = true)]
async fn retaliating_against_an_offender_is_free() {
    let (runtime, handle) = start().await;
    let alice = handle.login("alice", "Warrior").await.unwrap();
    let bob = handle.login("bob", "Warrior").await.unwrap();

    strike(&handle, alice, bob).await;
    strike(&handle, bob, alice).await;

    let snapshot = handle.snapshot().await.unwrap();
    let attacker = snapshot.actor(alice).unwrap();
    assert_eq!(attacker.health, attacker.health_max - 15);
    assert!(has_buff(&snapshot, alice, "Offender"));
    assert!(!has_buff(&snapshot, bob, "Offender"));

    runtime.shutdown().await.unwrap();
}
