//! Movement компоненты: PhysicsBody, Arena

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinematic тело, которым управляет симуляция.
///
/// Abilities и AI пишут `velocity` или `move_target` (аналог MovePosition
/// на один тик). `integrate_bodies` применяет их к Transform раз в fixed тик
/// и клампит результат в границы арены.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    /// Позиция на этот тик (сбрасывается после интеграции)
    pub move_target: Option<Vec3>,
    /// CCD для быстрых dash/roll
    pub continuous_collision: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            move_target: None,
            continuous_collision: false,
        }
    }
}

impl PhysicsBody {
    /// Горизонтальная скорость, вертикальная (гравитация) не трогается
    pub fn set_horizontal_velocity(&mut self, horizontal: Vec3) {
        self.velocity.x = horizontal.x;
        self.velocity.z = horizontal.z;
    }

    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
    }
}

/// Границы арены в горизонтальной плоскости (x, z).
///
/// После каждого движения агент внутри `min + buffer ..= max - buffer`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct Arena {
    pub min: Vec2,
    pub max: Vec2,
    pub buffer: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            min: Vec2::splat(-100.0),
            max: Vec2::splat(100.0),
            buffer: 5.0,
        }
    }
}

impl Arena {
    pub fn inner_min(&self) -> Vec2 {
        self.min + Vec2::splat(self.buffer)
    }

    pub fn inner_max(&self) -> Vec2 {
        self.max - Vec2::splat(self.buffer)
    }

    /// Клампит x/z в границы с буфером, y не трогает
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        let lo = self.inner_min();
        let hi = self.inner_max();
        // Буфер шире арены → всё в центр
        let (lo, hi) = if !(lo.x <= hi.x && lo.y <= hi.y) {
            let centre = (self.min + self.max) * 0.5;
            (centre, centre)
        } else {
            (lo, hi)
        };

        Vec3::new(
            position.x.clamp(lo.x, hi.x),
            position.y,
            position.z.clamp(lo.y, hi.y),
        )
    }

    pub fn contains(&self, position: Vec3) -> bool {
        self.clamp(position) == position
    }
}
