//! Tests for combat systems (impacts, damage, death sequence) на headless App.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use bevy_rapier3d::prelude::{ExternalImpulse, RigidBody};

    use crate::abilities::{ImpactCommand, ImpactEvent};
    use crate::combat::{
        ComboTier, DamageEvent, Dead, KillCombo, DeathSequence, DespawnAfter, GameOutcome, LifeState, MatchResult, Ragdoll,
        RagdollState,
    };
    use crate::components::{Agent, Boss, CrowdMember, Destructible, Health, Player};
    use crate::create_headless_app;

    /// App + один пустой update (первый тик без delta)
    fn app() -> App {
        let mut app = create_headless_app(7);
        app.update();
        app
    }

    fn run(app: &mut App, ticks: usize) {
        for _ in 0..ticks {
            app.update();
        }
    }

    fn spawn_boss(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Agent::boss(),
                Boss,
                Health::new(200.0),
                DeathSequence::boss(),
                Transform::from_xyz(0.0, 0.0, 10.0),
            ))
            .id()
    }

    fn spawn_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Agent::player(),
                Player,
                Health::new(100.0).with_damage_scale(0.5),
                DeathSequence::player(),
                Transform::default(),
            ))
            .id()
    }

    fn impact(app: &mut App, target: Entity, command: ImpactCommand) {
        let source = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(ImpactEvent {
            source,
            target,
            command,
        });
    }

    #[test]
    fn test_crowd_member_killed_and_cleaned_up() {
        let mut app = app();
        let npc = app
            .world_mut()
            .spawn((CrowdMember, Transform::from_xyz(3.0, 0.0, 0.0)))
            .id();

        impact(&mut app, npc, ImpactCommand::Kill { force: Vec3::new(0.0, 50.0, 200.0) });
        run(&mut app, 1);

        let entity = app.world().entity(npc);
        assert!(entity.contains::<Dead>());
        assert!(entity.contains::<DespawnAfter>());
        assert_eq!(entity.get::<RigidBody>(), Some(&RigidBody::Dynamic));
        assert_eq!(
            entity.get::<ExternalImpulse>().map(|external| external.impulse),
            Some(Vec3::new(0.0, 50.0, 200.0))
        );

        // 5 секунд трупа + запас
        run(&mut app, 320);
        assert!(app.world().get_entity(npc).is_err());
    }

    #[test]
    fn test_building_knocked_down_by_force() {
        let mut app = app();
        let building = app
            .world_mut()
            .spawn((Destructible::default(), RigidBody::Fixed, Transform::from_xyz(10.0, 0.0, 0.0)))
            .id();

        let force = Vec3::new(0.0, 0.0, -1000.0);
        impact(&mut app, building, ImpactCommand::ApplyForce { force, point: Vec3::new(10.0, 1.0, 0.0) });
        run(&mut app, 1);

        let entity = app.world().entity(building);
        let destructible = entity.get::<Destructible>().expect("building stays");
        assert!(destructible.knocked_down);
        assert_eq!(destructible.hits_taken, 1);
        assert_eq!(entity.get::<RigidBody>(), Some(&RigidBody::Dynamic));
        let external = entity.get::<ExternalImpulse>().expect("impulse applied");
        assert_eq!(external.impulse, force);
        assert!(external.torque_impulse.length() <= 300.0 + 1.0e-3);
    }

    #[test]
    fn test_boss_death_sequence() {
        let mut app = app();
        let boss = spawn_boss(&mut app);

        app.world_mut().send_event(DamageEvent {
            source: None,
            target: boss,
            amount: 500.0,
        });
        run(&mut app, 1);

        let entity = app.world().entity(boss);
        assert!(matches!(entity.get::<LifeState>(), Some(LifeState::Dying { .. })));
        assert!(entity.contains::<Dead>());
        assert_eq!(entity.get::<Health>().map(|health| health.current), Some(0.0));
        assert_eq!(app.world().resource::<MatchResult>().0, None);

        // Повторный урон по умирающему игнорируется
        app.world_mut().send_event(DamageEvent {
            source: None,
            target: boss,
            amount: 500.0,
        });
        run(&mut app, 1);
        assert!(matches!(app.world().entity(boss).get::<LifeState>(), Some(LifeState::Dying { .. })));

        // 5 секунд death sequence
        run(&mut app, 310);
        let entity = app.world().entity(boss);
        assert_eq!(entity.get::<LifeState>(), Some(&LifeState::Defeated));
        assert_eq!(entity.get::<Ragdoll>().map(|ragdoll| ragdoll.state), Some(RagdollState::Permanent));
        assert!(entity.contains::<DespawnAfter>());
        assert_eq!(
            app.world().resource::<MatchResult>().0,
            Some(GameOutcome::BossDefeated { boss })
        );

        // + 10 секунд до удаления
        run(&mut app, 620);
        assert!(app.world().get_entity(boss).is_err());
    }

    #[test]
    fn test_player_death_is_immediate() {
        let mut app = app();
        let player = spawn_player(&mut app);

        app.world_mut().send_event(DamageEvent {
            source: None,
            target: player,
            amount: 300.0,
        });
        run(&mut app, 1);

        let entity = app.world().entity(player);
        assert_eq!(entity.get::<LifeState>(), Some(&LifeState::Defeated));
        assert!(!entity.contains::<DespawnAfter>());
        assert_eq!(
            app.world().resource::<MatchResult>().0,
            Some(GameOutcome::PlayerDied { player })
        );
    }

    #[test]
    fn test_player_damage_scaled_and_ragdoll_recovers() {
        let mut app = app();
        let player = spawn_player(&mut app);

        app.world_mut().send_event(DamageEvent {
            source: None,
            target: player,
            amount: 40.0,
        });
        run(&mut app, 1);

        let entity = app.world().entity(player);
        assert_eq!(entity.get::<Health>().map(|health| health.current), Some(80.0));
        assert!(entity.get::<Ragdoll>().is_some_and(Ragdoll::is_active));

        run(&mut app, 40);
        let entity = app.world().entity(player);
        assert!(entity.get::<Ragdoll>().is_some_and(|ragdoll| !ragdoll.is_active()));
        assert!(entity.get::<LifeState>().is_some_and(LifeState::is_alive));
    }

    #[test]
    fn test_player_crowd_kills_build_combo_then_expire() {
        let mut app = app();
        let player = spawn_player(&mut app);
        let npcs: Vec<Entity> = (0..6)
            .map(|i| {
                app.world_mut()
                    .spawn((CrowdMember, Transform::from_xyz(i as f32, 0.0, 0.0)))
                    .id()
            })
            .collect();

        for npc in &npcs[..5] {
            app.world_mut().send_event(ImpactEvent {
                source: player,
                target: *npc,
                command: ImpactCommand::Kill { force: Vec3::Y },
            });
        }
        // Убийство не игроком в combo не идёт
        impact(&mut app, npcs[5], ImpactCommand::Kill { force: Vec3::Y });
        run(&mut app, 1);

        let combo = *app.world().resource::<KillCombo>();
        assert_eq!(combo.current, 5);
        assert_eq!(combo.tier(), Some(ComboTier::Nice));

        // Окно 3s без убийств → сброс, рекорд остаётся
        run(&mut app, 190);
        let combo = *app.world().resource::<KillCombo>();
        assert_eq!(combo.current, 0);
        assert_eq!(combo.highest, 5);
    }
}
