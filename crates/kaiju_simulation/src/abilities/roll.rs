//! Roll: кувырок-таран с вращением
//!
//! Как DashSlash, но тело крутится вокруг локальной X (720°/с),
//! а удар засчитывается только пока идёт кувырок.
//! На выходе ориентация возвращается к стартовой (по yaw).

use bevy::prelude::*;

use crate::abilities::{
    aim_direction, face_direction, strike_area, Ability, AbilityContext, AbilityDescriptor,
    AbilityExit, AbilityUser, StepResult, StrikeArea, OBSTACLE_PROBE_DISTANCE,
};

#[derive(Debug, Clone)]
pub struct Roll {
    descriptor: AbilityDescriptor,
    /// Градусы в секунду
    pub spin_rate: f32,
    direction: Vec3,
    start_rotation: Quat,
    rolling: bool,
}

impl Roll {
    pub fn new(descriptor: AbilityDescriptor) -> Self {
        Self {
            descriptor,
            spin_rate: 720.0,
            direction: Vec3::NEG_Z,
            start_rotation: Quat::IDENTITY,
            rolling: false,
        }
    }
}

impl Ability for Roll {
    fn descriptor(&self) -> &AbilityDescriptor {
        &self.descriptor
    }

    fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let body = user.body();

        self.direction = aim_direction(body.transform, ctx.target);
        face_direction(body.transform, self.direction);
        self.start_rotation = body.transform.rotation;
        body.body.continuous_collision = true;
        self.rolling = true;

        ctx.cue("roll_start", body.transform.translation, boss);
    }

    fn step(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> StepResult {
        let speed = self.descriptor.range / self.descriptor.duration;
        let body = user.body();

        body.body.set_horizontal_velocity(self.direction * speed);
        body.transform.rotate_local_x(-self.spin_rate.to_radians() * ctx.dt);

        let blocked = ctx
            .world
            .raycast(
                body.transform.translation,
                self.direction,
                OBSTACLE_PROBE_DISTANCE,
                Some(ctx.self_entity),
            )
            .is_some_and(|hit| !hit.is_trigger);

        if blocked {
            StepResult::EarlyExit
        } else {
            StepResult::Continue
        }
    }

    fn trigger_strike(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        if !self.rolling {
            return;
        }

        let boss = user.is_boss_variant();
        let center = user.body().transform.translation;

        ctx.cue("roll_impact", center, boss);
        strike_area(
            ctx,
            StrikeArea {
                center,
                radius: self.descriptor.radius,
                force: self.descriptor.force,
                health_damage_ratio: self.descriptor.health_damage_ratio,
                lift: None,
                flatten: false,
            },
        );
    }

    fn end(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>, _exit: AbilityExit) {
        let boss = user.is_boss_variant();
        let body = user.body();

        body.transform.rotation = self.start_rotation;
        // Кувырок гасит и вертикальную скорость
        body.body.velocity = Vec3::ZERO;
        self.rolling = false;

        ctx.cue("roll_end", body.transform.translation, boss);
    }
}
