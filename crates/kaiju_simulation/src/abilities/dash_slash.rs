//! DashSlash: рывок вперёд + удар по области
//!
//! Направление фиксируется при старте (босс не доворачивает рывок).
//! Скорость = range / duration, CCD включён на время рывка.
//! Если в 1 м впереди твёрдое препятствие (не trigger): early exit.

use bevy::prelude::*;

use crate::abilities::{
    aim_direction, face_direction, strike_area, Ability, AbilityContext, AbilityDescriptor,
    AbilityExit, AbilityUser, StepResult, StrikeArea, OBSTACLE_PROBE_DISTANCE,
};

#[derive(Debug, Clone)]
pub struct DashSlash {
    descriptor: AbilityDescriptor,
    direction: Vec3,
}

impl DashSlash {
    pub fn new(descriptor: AbilityDescriptor) -> Self {
        Self {
            descriptor,
            direction: Vec3::NEG_Z,
        }
    }

    fn speed(&self) -> f32 {
        self.descriptor.range / self.descriptor.duration
    }
}

impl Ability for DashSlash {
    fn descriptor(&self) -> &AbilityDescriptor {
        &self.descriptor
    }

    fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let body = user.body();

        self.direction = aim_direction(body.transform, ctx.target);
        face_direction(body.transform, self.direction);
        body.body.continuous_collision = true;

        ctx.cue("dash_start", body.transform.translation, boss);
    }

    fn step(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> StepResult {
        let body = user.body();
        body.body.set_horizontal_velocity(self.direction * self.speed());

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
        let boss = user.is_boss_variant();
        let center = user.body().transform.translation;

        ctx.cue("slash", center, boss);
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
        ctx.cue("dash_trail_stop", user.body().transform.translation, boss);
    }
}
