//! Agent capability interface: что ability может требовать от исполнителя

use bevy::prelude::*;

use crate::components::{Agent, PhysicsBody};

/// Эксклюзивный доступ к телу агента на время ability.
pub struct BodyMut<'a> {
    pub transform: &'a mut Transform,
    pub body: &'a mut PhysicsBody,
}

/// Исполнитель ability (player, boss, будущий NPC).
///
/// Abilities никогда не смотрят на конкретный тип агента,
/// только на этот контракт.
pub trait AbilityUser {
    fn body(&mut self) -> BodyMut<'_>;

    /// true перед стартом, false после любого выхода (complete/early/abort).
    fn set_busy(&mut self, busy: bool);

    fn is_busy(&self) -> bool;

    /// Только для выбора boss-flavored audio/vfx.
    fn is_boss_variant(&self) -> bool;
}

/// ECS адаптер: компоненты агента, одолженные на один тик.
pub struct AgentHandle<'a> {
    pub agent: &'a mut Agent,
    pub transform: &'a mut Transform,
    pub body: &'a mut PhysicsBody,
}

impl AbilityUser for AgentHandle<'_> {
    fn body(&mut self) -> BodyMut<'_> {
        BodyMut {
            transform: &mut *self.transform,
            body: &mut *self.body,
        }
    }

    fn set_busy(&mut self, busy: bool) {
        self.agent.busy = busy;
    }

    fn is_busy(&self) -> bool {
        self.agent.busy
    }

    fn is_boss_variant(&self) -> bool {
        self.agent.is_boss_variant()
    }
}

/// Горизонтальный forward (−Z в Bevy). Если тело смотрит строго вверх/вниз → −Z.
pub fn flat_forward(transform: &Transform) -> Vec3 {
    let forward = transform.forward().as_vec3();
    Vec3::new(forward.x, 0.0, forward.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z)
}

/// Горизонтальное направление на точку, иначе текущий forward.
pub fn aim_direction(transform: &Transform, target: Option<Vec3>) -> Vec3 {
    target
        .and_then(|point| {
            let delta = point - transform.translation;
            Vec3::new(delta.x, 0.0, delta.z).try_normalize()
        })
        .unwrap_or_else(|| flat_forward(transform))
}

/// Поворачивает тело по yaw в сторону `direction` (мгновенно).
pub fn face_direction(transform: &mut Transform, direction: Vec3) {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() > f32::EPSILON {
        let target = transform.translation + flat;
        transform.look_at(target, Vec3::Y);
    }
}
