//! BeamSweep: лучи из двух глаз, качаются в конусе перед агентом
//!
//! Каждый тик: угол += sweep_rate * dt (по достижении края конуса: обратно
//! на левый край), raycast из каждого глаза, урон пропорционален dt.
//! После end() лучей нет: урон прекращается сразу.

use bevy::prelude::*;

use crate::abilities::{
    flat_forward, Ability, AbilityContext, AbilityDescriptor, AbilityExit, AbilityUser,
    StepResult,
};

#[derive(Debug, Clone)]
pub struct BeamSweep {
    descriptor: AbilityDescriptor,
    /// Полный угол конуса, градусы
    pub cone_angle: f32,
    /// Градусы в секунду
    pub sweep_rate: f32,
    /// Глаза в локальных координатах агента (левый, правый)
    pub eye_offsets: [Vec3; 2],
    forward: Vec3,
    sweep_angle: f32,
}

impl BeamSweep {
    pub fn new(descriptor: AbilityDescriptor) -> Self {
        Self {
            descriptor,
            cone_angle: 90.0,
            sweep_rate: 30.0,
            eye_offsets: [Vec3::new(-0.6, 2.0, -0.5), Vec3::new(0.6, 2.0, -0.5)],
            forward: Vec3::NEG_Z,
            sweep_angle: -45.0,
        }
    }

    pub fn sweep_angle(&self) -> f32 {
        self.sweep_angle
    }

    fn advance_sweep(&mut self, dt: f32) {
        let half = self.cone_angle * 0.5;
        self.sweep_angle += self.sweep_rate * dt;
        if self.sweep_angle > half {
            self.sweep_angle = -half;
        }
    }

    fn sweep_direction(&self) -> Vec3 {
        Quat::from_rotation_y(self.sweep_angle.to_radians()) * self.forward
    }
}

impl Ability for BeamSweep {
    fn descriptor(&self) -> &AbilityDescriptor {
        &self.descriptor
    }

    fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let body = user.body();

        self.forward = flat_forward(body.transform);
        self.sweep_angle = -self.cone_angle * 0.5;

        ctx.cue("beam_start", body.transform.translation, boss);
    }

    fn step(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> StepResult {
        self.advance_sweep(ctx.dt);
        let direction = self.sweep_direction();

        let body = user.body();
        let origin = body.transform.translation;
        let rotation = body.transform.rotation;

        // Сила за тик: dps * dt
        let force = self.descriptor.force * ctx.dt;
        let damage = force * self.descriptor.health_damage_ratio;

        for offset in self.eye_offsets {
            let eye = origin + rotation * offset;
            let Some(hit) = ctx
                .world
                .raycast(eye, direction, self.descriptor.range, Some(ctx.self_entity))
            else {
                continue;
            };

            ctx.dispatch(hit.entity, hit.capabilities, direction * force, hit.point, damage);
        }

        StepResult::Continue
    }

    /// Урон непрерывный (в step), отдельного удара нет
    fn trigger_strike(&mut self, _user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>) {}

    fn end(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>, _exit: AbilityExit) {
        let boss = user.is_boss_variant();
        ctx.cue("beam_end", user.body().transform.translation, boss);
    }
}
