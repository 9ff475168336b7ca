//! BossBrain: FSM состояние boss AI + кеш цели + formation slot

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;
use crate::ai::BossConfig;
use crate::execution::AbilityCooldowns;

/// Boss AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub enum BossAIState {
    /// Цели нет или она вне detection range: стоим
    #[default]
    Idle,

    /// Подход / отход / кружение вокруг цели
    Positioning,

    /// Побег на низком здоровье (вращаясь)
    Fleeing {
        started_at: f32,
        /// Точка побега (уже внутри арены)
        point: Vec3,
    },

    /// Ability выполняется (решения заморожены до её конца)
    ExecutingAbility {
        kind: AbilityKind,
    },
}

/// Component: boss decision loop state
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[require(BossConfig, AbilityCooldowns, TargetCache)]
pub struct BossBrain {
    pub state: BossAIState,
    /// Anti-repeat: не выбираем одно и то же дважды подряд
    pub last_ability: Option<AbilityKind>,
    /// Forced roll через здания в процессе (сбрасывается по окончании Roll)
    pub seeking_buildings: bool,
}

impl BossBrain {
    pub fn is_fleeing(&self) -> bool {
        matches!(self.state, BossAIState::Fleeing { .. })
    }

    pub fn is_executing(&self) -> bool {
        matches!(self.state, BossAIState::ExecutingAbility { .. })
    }
}

/// Component: текущая цель (перевыбирается периодически)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TargetCache {
    pub target: Option<Entity>,
    pub refreshed_at: f32,
}

impl Default for TargetCache {
    fn default() -> Self {
        Self {
            target: None,
            refreshed_at: f32::NEG_INFINITY,
        }
    }
}

impl TargetCache {
    pub fn needs_refresh(&self, now: f32, interval: f32) -> bool {
        self.target.is_none() || now >= self.refreshed_at + interval
    }
}

/// Component: место босса в formation (используется при ≥ 2 боссах)
///
/// Слот = цель + (cos θ, 0, sin θ) · radius, θ = phase_angle + общий поворот.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Formation {
    /// Радианы
    pub phase_angle: f32,
    pub radius: f32,
}

impl Formation {
    /// i-й из `count` боссов: равномерно по кругу
    pub fn evenly_spaced(index: usize, count: usize, radius: f32) -> Self {
        let count = count.max(1) as f32;
        Self {
            phase_angle: std::f32::consts::TAU * index as f32 / count,
            radius,
        }
    }

    /// `rotation`: общий для всех боссов угол (радианы)
    pub fn slot(&self, center: Vec3, rotation: f32) -> Vec3 {
        let angle = self.phase_angle + rotation;
        center + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.radius
    }
}
