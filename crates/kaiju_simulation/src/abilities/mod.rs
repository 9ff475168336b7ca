//! Abilities: DashSlash, JumpSlam, BeamSweep, Roll, Chomp
//!
//! Каждая ability: самодостаточный манёвр с ограниченной длительностью.
//! Ability не знает про ECS: тело агента приходит через `AbilityUser`,
//! мир: через `WorldQuery`, а удары и cues уходят в буфер `AbilityContext`.
//!
//! Жизненный цикл (ведёт `execution::AbilityTask`):
//! begin → step × N → (trigger_strike в любой момент Active) → end

use serde::{Deserialize, Serialize};

pub mod beam_sweep;
pub mod chomp;
pub mod dash_slash;
pub mod descriptor;
pub mod effects;
pub mod jump_slam;
pub mod roll;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use beam_sweep::BeamSweep;
pub use chomp::Chomp;
pub use dash_slash::DashSlash;
pub use descriptor::{AbilityDescriptor, AbilityKind, AbilityLoadout, StrikeTiming};
pub use effects::{
    strike_area, AbilityContext, AbilityEffect, FeedbackEvent, ImpactCommand, ImpactEvent,
    StrikeArea,
};
pub use jump_slam::JumpSlam;
pub use roll::Roll;
pub use user::{aim_direction, face_direction, flat_forward, AbilityUser, AgentHandle, BodyMut};

/// Дистанция raycast'а вперёд для early exit (dash/roll)
pub const OBSTACLE_PROBE_DISTANCE: f32 = 1.0;

/// Результат одного шага ability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    /// Упёрлись в препятствие: выходим раньше срока
    EarlyExit,
}

/// Как закончилась ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityExit {
    Completed,
    EarlyExit,
    /// Прервана координатором (смерть / ragdoll)
    Aborted,
}

/// Манёвр, выполняемый по одному шагу за fixed тик.
pub trait Ability: Send + Sync + std::fmt::Debug {
    fn descriptor(&self) -> &AbilityDescriptor;

    fn kind(&self) -> AbilityKind {
        self.descriptor().kind
    }

    /// Старт: снимок всего, что нужно на весь прогон (направление, точки).
    fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>);

    /// Один тик активной фазы (ctx.elapsed уже увеличен).
    fn step(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> StepResult;

    /// "Нанести удар сейчас". Вызывается не больше раза за прогон, отдельно от движения.
    fn trigger_strike(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>);

    /// Остановить свои эффекты. Скорость/CCD/busy сбрасывает AbilityTask.
    fn end(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>, exit: AbilityExit);
}

/// Создаёт ability по descriptor'у
pub fn build_ability(descriptor: AbilityDescriptor) -> Box<dyn Ability> {
    match descriptor.kind {
        AbilityKind::DashSlash => Box::new(DashSlash::new(descriptor)),
        AbilityKind::JumpSlam => Box::new(JumpSlam::new(descriptor)),
        AbilityKind::BeamSweep => Box::new(BeamSweep::new(descriptor)),
        AbilityKind::Roll => Box::new(Roll::new(descriptor)),
        AbilityKind::Chomp => Box::new(Chomp::new(descriptor)),
    }
}
