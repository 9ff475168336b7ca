//! AbilityTask: возобновляемый прогон одной ability
//!
//! Фазы: Idle → Active → (Completing | Aborted).
//! Один `tick` = один шаг цикла "пока elapsed < duration":
//! проверка срока, elapsed += dt, step. Cleanup выполняется на тике,
//! когда проверка срока не прошла (или сразу при early exit / abort).

use crate::abilities::{Ability, AbilityContext, AbilityExit, AbilityKind, AbilityUser, StepResult, StrikeTiming};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Idle,
    Active,
    Completing(AbilityExit),
    Aborted,
}

#[derive(Debug)]
pub struct AbilityTask {
    ability: Box<dyn Ability>,
    phase: TaskPhase,
    elapsed: f32,
    struck: bool,
}

impl AbilityTask {
    pub fn new(ability: Box<dyn Ability>) -> Self {
        Self {
            ability,
            phase: TaskPhase::Idle,
            elapsed: 0.0,
            struck: false,
        }
    }

    pub fn kind(&self) -> AbilityKind {
        self.ability.kind()
    }

    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_active(&self) -> bool {
        self.phase == TaskPhase::Active
    }

    pub fn has_struck(&self) -> bool {
        self.struck
    }

    /// Idle → Active: busy = true, ability снимает стартовое состояние.
    pub fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        if self.phase != TaskPhase::Idle {
            return;
        }

        user.set_busy(true);
        self.phase = TaskPhase::Active;
        self.elapsed = 0.0;
        ctx.elapsed = 0.0;
        self.ability.begin(user, ctx);
    }

    /// Один тик. `Some(exit)`: прогон закончен (повторные вызовы возвращают тот же exit).
    pub fn tick(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> Option<AbilityExit> {
        match self.phase {
            TaskPhase::Idle => return None,
            TaskPhase::Completing(exit) => return Some(exit),
            TaskPhase::Aborted => return Some(AbilityExit::Aborted),
            TaskPhase::Active => {}
        }

        let duration = self.ability.descriptor().duration;
        if self.elapsed >= duration {
            return Some(self.finish(user, ctx, AbilityExit::Completed));
        }

        self.elapsed += ctx.dt;
        ctx.elapsed = self.elapsed;

        if self.ability.step(user, ctx) == StepResult::EarlyExit {
            return Some(self.finish(user, ctx, AbilityExit::EarlyExit));
        }

        if let StrikeTiming::AtTime(at) = self.ability.descriptor().strike {
            if self.elapsed >= at {
                self.strike(user, ctx);
            }
        }

        None
    }

    /// Внешний удар (animation cue) или AtTime. Только в Active, максимум раз за прогон.
    pub fn strike(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> bool {
        if self.phase != TaskPhase::Active || self.struck {
            return false;
        }
        if self.ability.descriptor().strike == StrikeTiming::Continuous {
            return false;
        }

        self.struck = true;
        ctx.elapsed = self.elapsed;
        self.ability.trigger_strike(user, ctx);
        true
    }

    /// Прерывание (смерть / ragdoll). Удар не наносится.
    pub fn abort(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> Option<AbilityExit> {
        if self.phase != TaskPhase::Active {
            return None;
        }
        Some(self.finish(user, ctx, AbilityExit::Aborted))
    }

    fn finish(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>, exit: AbilityExit) -> AbilityExit {
        // Отложенный удар: приземление / момент удара, до которого не дошли
        if exit != AbilityExit::Aborted {
            self.strike(user, ctx);
        }

        // Сброс тела до ability.end: ability может поправить (приземлить, погасить y)
        let body = user.body();
        body.body.continuous_collision = false;
        body.body.stop_horizontal();
        body.body.move_target = None;

        self.ability.end(user, ctx, exit);

        user.set_busy(false);
        self.phase = match exit {
            AbilityExit::Aborted => TaskPhase::Aborted,
            other => TaskPhase::Completing(other),
        };
        exit
    }
}
