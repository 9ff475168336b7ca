//! Positioning: подход / отход / кружение / formation slot
//!
//! Всё движение: скорость к точке. Точка клампится в арену,
//! позицию после интеграции клампит integrate_bodies.

use bevy::prelude::*;

use crate::ai::{BossConfig, Formation};
use crate::components::Arena;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositioningMode {
    Approach,
    Formation,
    Retreat,
    Orbit,
}

/// Горизонтальная дистанция
pub fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Горизонтальная скорость к точке, без перелёта за один тик
pub fn velocity_toward(position: Vec3, point: Vec3, speed: f32, dt: f32) -> Vec3 {
    let delta = Vec3::new(point.x - position.x, 0.0, point.z - position.z);
    let distance = delta.length();
    if distance <= f32::EPSILON || speed <= 0.0 {
        return Vec3::ZERO;
    }

    let step = speed * dt;
    if dt > 0.0 && step > distance {
        delta / dt
    } else {
        delta / distance * speed
    }
}

/// Режим по дистанции: > preferred + margin → подход, < close - margin → отход
pub fn positioning_mode(distance: f32, coordinating: bool, config: &BossConfig) -> PositioningMode {
    if distance > config.preferred_range + config.approach_margin {
        if coordinating {
            PositioningMode::Formation
        } else {
            PositioningMode::Approach
        }
    } else if distance < config.close_range - config.retreat_margin {
        PositioningMode::Retreat
    } else {
        PositioningMode::Orbit
    }
}

/// Точка на круге вокруг цели после поворота на `orbit_speed · dt` по дуге
pub fn orbit_point(position: Vec3, target: Vec3, speed: f32, dt: f32) -> Vec3 {
    let offset = Vec3::new(position.x - target.x, 0.0, position.z - target.z);
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return position;
    }

    let angle = speed * dt / radius;
    let rotated = Quat::from_rotation_y(angle) * offset;
    Vec3::new(target.x + rotated.x, position.y, target.z + rotated.z)
}

/// Точка побега: flee_distance от цели по прямой, внутри арены
pub fn flee_point(position: Vec3, target: Vec3, config: &BossConfig, arena: &Arena) -> Vec3 {
    let away = Vec3::new(position.x - target.x, 0.0, position.z - target.z)
        .try_normalize()
        .unwrap_or(Vec3::Z);
    arena.clamp(position + away * config.flee_distance)
}

/// Скорость positioning на этот тик.
///
/// `formation`: (слот, общий поворот), только когда координируются ≥ 2 босса.
pub fn positioning_velocity(
    position: Vec3,
    target: Vec3,
    formation: Option<(&Formation, f32)>,
    config: &BossConfig,
    arena: &Arena,
    dt: f32,
) -> (PositioningMode, Vec3) {
    let distance = flat_distance(position, target);
    let mode = positioning_mode(distance, formation.is_some(), config);

    let point = match (mode, formation) {
        (PositioningMode::Formation, Some((slot, rotation))) => slot.slot(target, rotation),
        (PositioningMode::Retreat, _) => {
            let away = Vec3::new(position.x - target.x, 0.0, position.z - target.z)
                .try_normalize()
                .unwrap_or(Vec3::Z);
            position + away * config.retreat_speed()
        }
        (PositioningMode::Orbit, _) => orbit_point(position, target, config.orbit_speed, dt),
        _ => target,
    };

    let speed = match mode {
        PositioningMode::Retreat => config.retreat_speed(),
        PositioningMode::Orbit => config.orbit_speed,
        PositioningMode::Approach | PositioningMode::Formation => config.reposition_speed,
    };

    (mode, velocity_toward(position, arena.clamp(point), speed, dt))
}
