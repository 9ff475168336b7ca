//! Boss fight integration test
//!
//! Headless App, полный тик (AI → abilities → impacts → lifecycle → movement).
//!
//! Проверяем:
//! - busy == активная ability после каждого тика
//! - агенты всегда внутри арены
//! - босс бежит при низком здоровье
//! - AbilityRequest игрока: запуск, отказ (busy / cooldown), урон по боссу
//! - прерывание: ragdoll обрывает ability, запрос во время ragdoll отклоняется
//! - смерть цели: босс теряет её и берёт следующего игрока

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody};
use kaiju_simulation::ai::TargetCache;
use kaiju_simulation::logger::{set_logger, MemoryLogger};
use kaiju_simulation::*;

/// Все AbilityEnded за прогон
#[derive(Resource, Default)]
struct EndedLog(Vec<AbilityEnded>);

/// Нарушения инвариантов (busy / арена)
#[derive(Resource, Default)]
struct Violations(Vec<String>);

fn record_ended(mut events: EventReader<AbilityEnded>, mut log: ResMut<EndedLog>) {
    log.0.extend(events.read().cloned());
}

fn check_invariants(
    agents: Query<(Entity, &Agent, &AbilityExecutor, &Transform, &LifeState)>,
    arena: Res<Arena>,
    mut violations: ResMut<Violations>,
) {
    for (entity, agent, executor, transform, life) in agents.iter() {
        if agent.busy != executor.is_active() {
            violations
                .0
                .push(format!("{:?}: busy {} vs active {}", entity, agent.busy, executor.is_active()));
        }
        if life.is_alive() && !arena.contains(transform.translation) {
            violations
                .0
                .push(format!("{:?} left the arena at {:?}", entity, transform.translation));
        }
    }
}

/// Helper: App + инструментирование
fn create_fight_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.init_resource::<EndedLog>()
        .init_resource::<Violations>()
        .add_systems(
            FixedUpdate,
            (
                record_ended.after(SimulationSet::Execution),
                check_invariants.after(SimulationSet::Movement),
            ),
        );
    app.update();
    app
}

fn tuning(app: &App) -> Tuning {
    app.world().resource::<Tuning>().clone()
}

fn ended_for(app: &App, entity: Entity) -> Vec<(AbilityKind, AbilityEndReason)> {
    app.world()
        .resource::<EndedLog>()
        .0
        .iter()
        .filter(|event| event.entity == entity)
        .map(|event| (event.kind, event.reason.clone()))
        .collect()
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

/// Босс без AI (манекен для ударов игрока)
fn spawn_dummy_boss(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Agent::boss(),
            Boss,
            Health::new(200.0),
            DeathSequence::boss(),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(4.0, 3.0),
        ))
        .id()
}

#[test]
fn test_boss_attacks_player_within_invariants() {
    let mut app = create_fight_app(42);
    let tuning = tuning(&app);

    let player = spawn_player(&mut app.world_mut().commands(), Vec3::ZERO, &tuning);
    let boss = spawn_boss(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, 12.0), &tuning, None);
    app.world_mut().flush();

    // 10 секунд боя
    run(&mut app, 600);

    let violations = &app.world().resource::<Violations>().0;
    assert!(violations.is_empty(), "invariant violations: {:?}", violations);

    let ended = &app.world().resource::<EndedLog>().0;
    let boss_abilities: Vec<_> = ended.iter().filter(|event| event.entity == boss).collect();
    assert!(!boss_abilities.is_empty(), "boss never finished an ability");
    assert!(boss_abilities
        .iter()
        .all(|event| !matches!(event.reason, AbilityEndReason::Rejected(_))));

    let cooldowns = app.world().get::<AbilityCooldowns>(boss).expect("boss alive");
    assert!(AbilityKind::ALL.iter().any(|kind| cooldowns.last_used(*kind).is_some()));

    // Игрок без водителя: никаких abilities
    assert!(ended.iter().all(|event| event.entity != player));
}

#[test]
fn test_low_health_boss_flees() {
    let mut app = create_fight_app(7);
    let tuning = tuning(&app);

    spawn_player(&mut app.world_mut().commands(), Vec3::ZERO, &tuning);
    let boss = spawn_boss(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, 10.0), &tuning, None);
    app.world_mut().flush();
    if let Some(mut health) = app.world_mut().get_mut::<Health>(boss) {
        health.current = 50.0;
    }

    // 1 секунда: побег длится flee_duration = 3s
    run(&mut app, 60);

    let world = app.world();
    let brain = world.get::<BossBrain>(boss).expect("boss alive");
    assert!(brain.is_fleeing(), "state {:?}", brain.state);
    let position = world.get::<Transform>(boss).expect("boss alive").translation;
    assert!(position.z > 25.0, "boss at {:?}", position);

    let ended = &world.resource::<EndedLog>().0;
    assert!(ended.iter().all(|event| event.entity != boss));
}

#[test]
fn test_player_dash_hits_boss_and_respects_cooldown() {
    let mut app = create_fight_app(3);
    let tuning = tuning(&app);

    let player = spawn_player(&mut app.world_mut().commands(), Vec3::ZERO, &tuning);
    app.world_mut().flush();
    // Манекен сбоку от линии рывка: луч препятствий его не видит, удар задевает
    let boss = spawn_dummy_boss(&mut app, Vec3::new(6.0, 0.0, -12.0));

    let request = AbilityRequest {
        entity: player,
        kind: AbilityKind::DashSlash,
        target: Some(Vec3::new(0.0, 0.0, -30.0)),
    };
    app.world_mut().send_event(request.clone());
    run(&mut app, 1);
    assert!(app.world().get::<Agent>(player).is_some_and(|agent| agent.busy));

    // Повторный запрос во время рывка
    app.world_mut().send_event(request.clone());
    run(&mut app, 30);

    let health = app.world().get::<Health>(boss).expect("dummy alive").current;
    assert_eq!(health, 180.0);

    // Cooldown 3s ещё не прошёл
    app.world_mut().send_event(request);
    run(&mut app, 1);

    let ended: Vec<_> = app
        .world()
        .resource::<EndedLog>()
        .0
        .iter()
        .filter(|event| event.entity == player)
        .map(|event| event.reason.clone())
        .collect();
    assert_eq!(ended.len(), 3, "ended: {:?}", ended);
    assert_eq!(ended[0], AbilityEndReason::Rejected(LaunchRejected::Busy));
    assert_eq!(ended[1], AbilityEndReason::Completed);
    assert!(matches!(
        ended[2],
        AbilityEndReason::Rejected(LaunchRejected::OnCooldown {
            kind: AbilityKind::DashSlash,
            ..
        })
    ));

    let violations = &app.world().resource::<Violations>().0;
    assert!(violations.is_empty(), "invariant violations: {:?}", violations);
}

#[test]
fn test_boss_defeat_ends_match() {
    let mut app = create_fight_app(11);
    let tuning = tuning(&app);

    spawn_player(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, -40.0), &tuning);
    let boss = spawn_boss(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, 40.0), &tuning, None);
    app.world_mut().flush();

    app.world_mut().send_event(DamageEvent {
        source: None,
        target: boss,
        amount: 1000.0,
    });
    run(&mut app, 1);
    assert!(matches!(app.world().get::<LifeState>(boss), Some(LifeState::Dying { .. })));

    // Мёртвый босс больше не думает и не двигается сам
    let frozen = app.world().get::<Transform>(boss).expect("boss dying").translation;
    run(&mut app, 120);
    assert_eq!(app.world().get::<Transform>(boss).expect("boss dying").translation, frozen);

    run(&mut app, 200);
    assert_eq!(
        app.world().resource::<MatchResult>().0,
        Some(GameOutcome::BossDefeated { boss })
    );
}

#[test]
fn test_ragdoll_aborts_boss_dash() {
    let mut app = create_fight_app(5);
    let tuning = tuning(&app);

    // Игроков нет: AI босса в Idle и сам ничего не запускает
    let boss = spawn_boss(&mut app.world_mut().commands(), Vec3::ZERO, &tuning, None);
    app.world_mut().flush();

    app.world_mut().send_event(AbilityRequest {
        entity: boss,
        kind: AbilityKind::DashSlash,
        target: Some(Vec3::new(0.0, 0.0, -30.0)),
    });
    run(&mut app, 1);
    assert!(app.world().get::<Agent>(boss).is_some_and(|agent| agent.busy));

    // Удар ≥ порога ragdoll посреди рывка
    app.world_mut().send_event(DamageEvent {
        source: None,
        target: boss,
        amount: 20.0,
    });
    run(&mut app, 2);

    let world = app.world();
    assert!(world.get::<Ragdoll>(boss).is_some_and(Ragdoll::is_active));
    assert_eq!(world.get::<Health>(boss).map(|health| health.current), Some(180.0));
    assert!(world.get::<Agent>(boss).is_some_and(|agent| !agent.busy));
    assert!(world.get::<AbilityExecutor>(boss).is_some_and(|executor| !executor.is_active()));
    assert_eq!(
        ended_for(&app, boss),
        vec![(AbilityKind::DashSlash, AbilityEndReason::Aborted)]
    );

    // Оборванный рывок больше не завершается
    run(&mut app, 30);
    assert_eq!(ended_for(&app, boss).len(), 1);

    let violations = &app.world().resource::<Violations>().0;
    assert!(violations.is_empty(), "invariant violations: {:?}", violations);
}

#[test]
fn test_request_during_ragdoll_rejected_and_logged() {
    let mut app = create_fight_app(9);
    let tuning = tuning(&app);

    let player = spawn_player(&mut app.world_mut().commands(), Vec3::ZERO, &tuning);
    app.world_mut().flush();

    let lines = MemoryLogger::new();
    set_logger(Box::new(lines.clone()));

    app.world_mut().send_event(DamageEvent {
        source: None,
        target: player,
        amount: 40.0,
    });
    run(&mut app, 1);
    assert!(app.world().get::<Ragdoll>(player).is_some_and(Ragdoll::is_active));

    let roll = AbilityRequest {
        entity: player,
        kind: AbilityKind::Roll,
        target: None,
    };
    app.world_mut().send_event(roll.clone());
    run(&mut app, 1);

    assert_eq!(
        ended_for(&app, player),
        vec![(
            AbilityKind::Roll,
            AbilityEndReason::Rejected(LaunchRejected::Incapacitated)
        )]
    );
    assert!(app.world().get::<Agent>(player).is_some_and(|agent| !agent.busy));
    assert!(lines.contains(&format!(
        "{:?} {} rejected: {}",
        player,
        AbilityKind::Roll,
        LaunchRejected::Incapacitated
    )));

    // Ragdoll 0.5s прошёл: тот же запрос запускается
    run(&mut app, 40);
    assert!(app.world().get::<Ragdoll>(player).is_some_and(|ragdoll| !ragdoll.is_active()));
    app.world_mut().send_event(roll);
    run(&mut app, 1);
    assert!(app.world().get::<Agent>(player).is_some_and(|agent| agent.busy));
}

#[test]
fn test_boss_drops_dead_target_and_reacquires() {
    let mut app = create_fight_app(13);
    let tuning = tuning(&app);

    let first = spawn_player(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, -10.0), &tuning);
    let boss = spawn_boss(&mut app.world_mut().commands(), Vec3::ZERO, &tuning, None);
    app.world_mut().flush();

    run(&mut app, 5);
    assert_eq!(app.world().get::<TargetCache>(boss).and_then(|cache| cache.target), Some(first));

    app.world_mut().send_event(DamageEvent {
        source: None,
        target: first,
        amount: 1000.0,
    });
    // Текущая ability босса (beam до 4s) доигрывает, потом Idle
    run(&mut app, 300);

    let world = app.world();
    assert!(!world.get::<LifeState>(first).is_some_and(LifeState::is_alive));
    assert_eq!(world.get::<TargetCache>(boss).and_then(|cache| cache.target), None);
    assert_eq!(world.get::<BossBrain>(boss).map(|brain| brain.state), Some(BossAIState::Idle));
    assert!(world.get::<Agent>(boss).is_some_and(|agent| !agent.busy));

    let boss_position = world.get::<Transform>(boss).expect("boss alive").translation;
    let second = spawn_player(
        &mut app.world_mut().commands(),
        boss_position + Vec3::new(0.0, 0.0, 15.0),
        &tuning,
    );
    app.world_mut().flush();
    run(&mut app, 2);

    let world = app.world();
    assert_eq!(world.get::<TargetCache>(boss).and_then(|cache| cache.target), Some(second));
    assert_ne!(world.get::<BossBrain>(boss).map(|brain| brain.state), Some(BossAIState::Idle));

    let violations = &world.resource::<Violations>().0;
    assert!(violations.is_empty(), "invariant violations: {:?}", violations);
}
