//! Общие хелперы для тестов abilities/execution

use bevy::prelude::*;

use crate::abilities::{AbilityEffect, AbilityUser, BodyMut, ImpactCommand};
use crate::components::{Agent, PhysicsBody};

pub const DT: f32 = 1.0 / 60.0;

/// Владеющая версия агента (без ECS)
#[derive(Debug, Clone)]
pub struct TestUser {
    pub agent: Agent,
    pub transform: Transform,
    pub body: PhysicsBody,
    /// Каждый вызов set_busy (проверяем, что busy снимается на всех путях)
    pub busy_log: Vec<bool>,
}

impl TestUser {
    pub fn boss_at(position: Vec3) -> Self {
        Self::new(Agent::boss(), position)
    }

    pub fn player_at(position: Vec3) -> Self {
        Self::new(Agent::player(), position)
    }

    fn new(agent: Agent, position: Vec3) -> Self {
        Self {
            agent,
            transform: Transform::from_translation(position),
            body: PhysicsBody::default(),
            busy_log: Vec::new(),
        }
    }

    /// Простая интеграция тела (без арены), как integrate_bodies
    pub fn integrate(&mut self, dt: f32) {
        self.transform.translation =
            crate::physics::integrate_step(&mut self.body, self.transform.translation, dt, None);
    }
}

impl AbilityUser for TestUser {
    fn body(&mut self) -> BodyMut<'_> {
        BodyMut {
            transform: &mut self.transform,
            body: &mut self.body,
        }
    }

    fn set_busy(&mut self, busy: bool) {
        self.agent.busy = busy;
        self.busy_log.push(busy);
    }

    fn is_busy(&self) -> bool {
        self.agent.busy
    }

    fn is_boss_variant(&self) -> bool {
        self.agent.is_boss_variant()
    }
}

pub fn self_entity() -> Entity {
    Entity::from_raw(1)
}

pub fn impacts_on(effects: &[AbilityEffect], target: Entity) -> Vec<ImpactCommand> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            AbilityEffect::Impact { target: t, command } if *t == target => Some(*command),
            _ => None,
        })
        .collect()
}

pub fn cue_names(effects: &[AbilityEffect]) -> Vec<&'static str> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            AbilityEffect::Cue(cue) => Some(cue.name),
            _ => None,
        })
        .collect()
}
