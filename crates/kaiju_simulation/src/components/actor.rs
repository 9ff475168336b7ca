//! Actor компоненты: Agent, Health, маркеры Player/Boss

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{LifeState, Ragdoll};
use crate::components::PhysicsBody;

/// Вариант агента.
///
/// Используется только для audio/vfx cues и дефолтного тюнинга.
/// Gameplay логика на нём не ветвится.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum AgentVariant {
    #[default]
    Player,
    Boss,
}

/// Agent: всё, что умеет выполнять abilities (player, boss, будущие NPC).
///
/// Required components: Health, PhysicsBody, Transform, LifeState, Ragdoll.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(Health, PhysicsBody, Transform, LifeState, Ragdoll)]
pub struct Agent {
    pub variant: AgentVariant,
    /// true всё время выполнения ability (ставит и снимает только AbilityTask)
    pub busy: bool,
}

impl Agent {
    pub fn player() -> Self {
        Self {
            variant: AgentVariant::Player,
            busy: false,
        }
    }

    pub fn boss() -> Self {
        Self {
            variant: AgentVariant::Boss,
            busy: false,
        }
    }

    pub fn is_boss_variant(&self) -> bool {
        self.variant == AgentVariant::Boss
    }
}

/// Маркер: игрок (цель боссов)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Маркер: босс (считается для formation)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Boss;

/// Здоровье.
///
/// Инвариант: 0 ≤ current ≤ max
///
/// `damage_scale` умножает каждый входящий удар: игрок получает
/// половину того, что получил бы босс от того же roll/chomp.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub damage_scale: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            damage_scale: 1.0,
        }
    }

    pub fn with_damage_scale(mut self, scale: f32) -> Self {
        self.damage_scale = scale;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Применяет удар (до scaling). Возвращает реально снятое здоровье.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let scaled = (amount * self.damage_scale).max(0.0);
        let before = self.current;
        self.current = (self.current - scaled).max(0.0);
        before - self.current
    }
}
