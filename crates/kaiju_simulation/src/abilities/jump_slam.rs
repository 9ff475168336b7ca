//! JumpSlam: прыжок по дуге вперёд, ударная волна при приземлении

use bevy::prelude::*;
use std::f32::consts::PI;

use crate::abilities::{
    aim_direction, face_direction, strike_area, Ability, AbilityContext, AbilityDescriptor,
    AbilityExit, AbilityUser, StepResult, StrikeArea,
};

#[derive(Debug, Clone)]
pub struct JumpSlam {
    descriptor: AbilityDescriptor,
    /// Высота апекса дуги
    pub height: f32,
    /// y направления ударной волны (подбрасывает цели)
    pub lift: f32,
    start: Vec3,
    landing: Vec3,
}

impl JumpSlam {
    pub fn new(descriptor: AbilityDescriptor) -> Self {
        Self {
            descriptor,
            height: 10.0,
            lift: 0.5,
            start: Vec3::ZERO,
            landing: Vec3::ZERO,
        }
    }

    /// Точка дуги при нормализованном времени t ∈ [0, 1]
    pub fn arc_point(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let mut point = self.start.lerp(self.landing, t);
        point.y = self.start.y + (t * PI).sin() * self.height;
        point
    }
}

impl Ability for JumpSlam {
    fn descriptor(&self) -> &AbilityDescriptor {
        &self.descriptor
    }

    fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let body = user.body();

        let direction = aim_direction(body.transform, ctx.target);
        face_direction(body.transform, direction);
        self.start = body.transform.translation;
        self.landing = self.start + direction * self.descriptor.range;

        ctx.cue("jump_start", self.start, boss);
    }

    fn step(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> StepResult {
        let t = ctx.elapsed / self.descriptor.duration;
        user.body().body.move_target = Some(self.arc_point(t));
        StepResult::Continue
    }

    fn trigger_strike(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let center = user.body().transform.translation;

        ctx.cue("slam_shockwave", center, boss);
        strike_area(
            ctx,
            StrikeArea {
                center,
                radius: self.descriptor.radius,
                force: self.descriptor.force,
                health_damage_ratio: self.descriptor.health_damage_ratio,
                lift: Some(self.lift),
                flatten: false,
            },
        );
    }

    fn end(&mut self, user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>, exit: AbilityExit) {
        if exit != AbilityExit::Aborted {
            return;
        }
        // Прервали в воздухе: опускаем на стартовую высоту
        let body = user.body();
        let position = body.transform.translation;
        body.body.move_target = Some(Vec3::new(position.x, self.start.y, position.z));
    }
}
