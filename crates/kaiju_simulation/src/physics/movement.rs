//! Интеграция движения агентов
//!
//! Kinematic модель: velocity/move_target пишут AI и abilities,
//! здесь они превращаются в Transform. Rapier компоненты (Velocity, Ccd)
//! только зеркалят состояние для физического backend'а.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Ccd, Velocity};

use crate::combat::Dead;
use crate::components::{Agent, Arena, PhysicsBody};

/// Один шаг тела: move_target (MovePosition) приоритетнее velocity.
///
/// Возвращает новую позицию, уже клампнутую в арену.
pub fn integrate_step(body: &mut PhysicsBody, position: Vec3, dt: f32, arena: Option<&Arena>) -> Vec3 {
    let next = match body.move_target.take() {
        Some(target) => target,
        None => position + body.velocity * dt,
    };

    match arena {
        Some(arena) => arena.clamp(next),
        None => next,
    }
}

/// Система интеграции velocity → Transform (FixedUpdate, последняя в тике)
///
/// Арена применяется после каждого движения, без исключений.
/// Мёртвые агенты отданы rapier (ragdoll), здесь не двигаются.
pub fn integrate_bodies(
    mut bodies: Query<
        (
            &mut PhysicsBody,
            &mut Transform,
            Option<&mut Velocity>,
            Option<&mut Ccd>,
        ),
        (With<Agent>, Without<Dead>),
    >,
    arena: Option<Res<Arena>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let arena = arena.as_deref();

    for (mut body, mut transform, rapier_velocity, ccd) in bodies.iter_mut() {
        transform.translation = integrate_step(&mut body, transform.translation, delta, arena);

        if let Some(mut rapier_velocity) = rapier_velocity {
            rapier_velocity.linvel = body.velocity;
        }
        if let Some(mut ccd) = ccd {
            ccd.enabled = body.continuous_collision;
        }
    }
}
