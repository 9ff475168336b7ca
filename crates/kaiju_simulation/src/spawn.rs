//! Спавн entity арены: игрок, боссы, здания, толпа
//!
//! Агенты: KinematicPositionBased (двигает integrate_bodies),
//! здания: Fixed до первого удара, толпа: Dynamic.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::ai::{BossBrain, Formation};
use crate::combat::DeathSequence;
use crate::components::{Agent, Boss, CrowdMember, Destructible, Health, PhysicsBody, Player};
use crate::config::Tuning;
use crate::execution::AbilityExecutor;

pub const BOSS_HEALTH: f32 = 200.0;
pub const PLAYER_HEALTH: f32 = 100.0;
/// Игрок получает половину урона
pub const PLAYER_DAMAGE_SCALE: f32 = 0.5;

pub fn spawn_player(commands: &mut Commands, position: Vec3, tuning: &Tuning) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            Agent::player(),
            Player,
            Health::new(PLAYER_HEALTH).with_damage_scale(PLAYER_DAMAGE_SCALE),
            DeathSequence::player(),
            AbilityExecutor::new(tuning.player_loadout.clone()),
            PhysicsBody {
                continuous_collision: true,
                ..default()
            },
            // Rapier physics
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(3.0, 2.0),
            Velocity::default(),
            Ccd::enabled(),
        ))
        .id()
}

/// `formation`: слот, если боссов несколько
pub fn spawn_boss(commands: &mut Commands, position: Vec3, tuning: &Tuning, formation: Option<Formation>) -> Entity {
    let mut entity = commands.spawn((
        Transform::from_translation(position),
        Agent::boss(),
        Boss,
        BossBrain::default(),
        tuning.boss.clone(),
        Health::new(BOSS_HEALTH),
        DeathSequence::boss(),
        AbilityExecutor::new(tuning.boss_loadout.clone()),
        PhysicsBody {
            continuous_collision: true,
            ..default()
        },
        // Rapier physics
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(4.0, 3.0),
        Velocity::default(),
        Ccd::enabled(),
    ));

    if let Some(formation) = formation {
        entity.insert(formation);
    }

    entity.id()
}

pub fn spawn_building(commands: &mut Commands, position: Vec3, half_extents: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position + Vec3::Y * half_extents.y),
            Destructible::default(),
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        ))
        .id()
}

pub fn spawn_crowd_member(commands: &mut Commands, position: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            CrowdMember,
            RigidBody::Dynamic,
            Collider::ball(0.5),
        ))
        .id()
}

/// Что заспавнила `spawn_arena_scene`
#[derive(Debug, Clone, Default)]
pub struct ArenaScene {
    pub player: Option<Entity>,
    pub bosses: Vec<Entity>,
    pub buildings: Vec<Entity>,
    pub crowd: Vec<Entity>,
}

/// Стандартная сцена: игрок на юге, боссы на севере,
/// кольцо зданий и толпа между ними.
pub fn spawn_arena_scene(commands: &mut Commands, tuning: &Tuning, boss_count: usize) -> ArenaScene {
    let mut scene = ArenaScene {
        player: Some(spawn_player(commands, Vec3::new(0.0, 0.0, -30.0), tuning)),
        ..default()
    };

    let boss_home = Vec3::new(0.0, 0.0, 30.0);
    for index in 0..boss_count {
        let formation = (boss_count >= 2)
            .then(|| Formation::evenly_spaced(index, boss_count, tuning.boss.preferred_range));
        let offset = formation.map_or(Vec3::ZERO, |slot| slot.slot(Vec3::ZERO, 0.0));
        scene
            .bosses
            .push(spawn_boss(commands, boss_home + offset, tuning, formation));
    }

    // Кольцо зданий радиуса 45
    for index in 0..12 {
        let angle = std::f32::consts::TAU * index as f32 / 12.0;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 45.0;
        scene
            .buildings
            .push(spawn_building(commands, position, Vec3::new(4.0, 10.0, 4.0)));
    }

    // Толпа: сетка 4×4 у игрока
    for row in 0..4 {
        for column in 0..4 {
            let position = Vec3::new(-12.0 + column as f32 * 8.0, 0.0, -12.0 + row as f32 * 4.0);
            scene.crowd.push(spawn_crowd_member(commands, position));
        }
    }

    crate::logger::log_info(&format!(
        "🏟️ Arena ready: {} boss(es), {} buildings, {} NPCs",
        scene.bosses.len(),
        scene.buildings.len(),
        scene.crowd.len()
    ));

    scene
}
