//! Tests for AbilityTask (фазы, busy, удары).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::abilities::test_support::*;
    use crate::abilities::{
        Ability, AbilityContext, AbilityDescriptor, AbilityExit, AbilityKind, AbilityUser,
        StepResult, StrikeTiming,
    };
    use crate::execution::{AbilityTask, TaskPhase};
    use crate::physics::CollisionWorld;

    /// Ability-заглушка: едет по +X, может упасть в early exit на заданном шаге
    #[derive(Debug)]
    struct Probe {
        descriptor: AbilityDescriptor,
        steps: u32,
        exit_on_step: Option<u32>,
    }

    impl Probe {
        fn new(duration: f32, strike: StrikeTiming) -> Self {
            let mut descriptor = AbilityDescriptor::standard(AbilityKind::Chomp, 1.0);
            descriptor.duration = duration;
            descriptor.strike = strike;
            Self {
                descriptor,
                steps: 0,
                exit_on_step: None,
            }
        }
    }

    impl Ability for Probe {
        fn descriptor(&self) -> &AbilityDescriptor {
            &self.descriptor
        }

        fn begin(&mut self, user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>) {
            user.body().body.continuous_collision = true;
        }

        fn step(&mut self, user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>) -> StepResult {
            self.steps += 1;
            user.body().body.set_horizontal_velocity(Vec3::X * 10.0);
            if Some(self.steps) == self.exit_on_step {
                StepResult::EarlyExit
            } else {
                StepResult::Continue
            }
        }

        fn trigger_strike(&mut self, _user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>) {}

        fn end(&mut self, _user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>, _exit: AbilityExit) {}
    }

    /// Прогоняет задачу до конца, возвращает (число тиков с busy=true, exit)
    fn run_to_end(task: &mut AbilityTask, user: &mut TestUser) -> (u32, AbilityExit) {
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut busy_ticks = 0;

        for _ in 0..10_000 {
            assert!(user.agent.busy, "busy снят до завершения");
            busy_ticks += 1;

            let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
            if let Some(exit) = task.tick(&mut *user, &mut ctx) {
                return (busy_ticks, exit);
            }
        }
        panic!("ability never finished");
    }

    fn started(probe: Probe) -> (AbilityTask, TestUser) {
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut user = TestUser::boss_at(Vec3::ZERO);
        let mut task = AbilityTask::new(Box::new(probe));

        assert_eq!(task.phase(), TaskPhase::Idle);
        assert!(!user.agent.busy);

        let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
        task.begin(&mut user, &mut ctx);
        (task, user)
    }

    #[test]
    fn test_busy_exactly_while_active() {
        let (mut task, mut user) = started(Probe::new(0.25, StrikeTiming::OnLanding));
        assert!(task.is_active());
        assert!(user.agent.busy);
        assert!(user.body.continuous_collision);

        let (busy_ticks, exit) = run_to_end(&mut task, &mut user);

        assert_eq!(exit, AbilityExit::Completed);
        // 0.25 / (1/60) = 15 шагов + тик cleanup
        assert!((15..=17).contains(&busy_ticks), "busy ticks = {}", busy_ticks);
        assert!(!user.agent.busy);
        assert_eq!(user.busy_log, vec![true, false]);
        assert!(!user.body.continuous_collision);
        assert_eq!(user.body.velocity, Vec3::ZERO);
        assert_eq!(task.phase(), TaskPhase::Completing(AbilityExit::Completed));
    }

    #[test]
    fn test_early_exit_cleans_up_same_tick() {
        let mut probe = Probe::new(1.0, StrikeTiming::AtTime(0.5));
        probe.exit_on_step = Some(3);
        let (mut task, mut user) = started(probe);

        let (busy_ticks, exit) = run_to_end(&mut task, &mut user);
        assert_eq!(exit, AbilityExit::EarlyExit);
        assert_eq!(busy_ticks, 3);
        assert!(!user.agent.busy);
        // Удар не успел по таймеру → срабатывает на выходе
        assert!(task.has_struck());
    }

    #[test]
    fn test_strike_fires_once() {
        let (mut task, mut user) = started(Probe::new(0.5, StrikeTiming::AtTime(0.1)));
        let world = CollisionWorld::default();
        let mut effects = Vec::new();

        // Внешний cue до таймера
        let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
        assert!(task.strike(&mut user, &mut ctx));
        assert!(!task.strike(&mut user, &mut ctx));

        let _ = run_to_end(&mut task, &mut user);
        assert!(task.has_struck());

        // После завершения strike игнорируется
        let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
        assert!(!task.strike(&mut user, &mut ctx));
    }

    #[test]
    fn test_abort_skips_strike_and_clears_busy() {
        let (mut task, mut user) = started(Probe::new(1.0, StrikeTiming::OnLanding));
        let world = CollisionWorld::default();
        let mut effects = Vec::new();

        for _ in 0..5 {
            let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
            assert!(task.tick(&mut user, &mut ctx).is_none());
        }

        let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
        assert_eq!(task.abort(&mut user, &mut ctx), Some(AbilityExit::Aborted));
        assert!(!task.has_struck());
        assert!(!user.agent.busy);
        assert_eq!(task.phase(), TaskPhase::Aborted);

        // Повторный abort: no-op, tick сообщает тот же exit
        assert_eq!(task.abort(&mut user, &mut ctx), None);
        assert_eq!(task.tick(&mut user, &mut ctx), Some(AbilityExit::Aborted));
        assert_eq!(user.busy_log, vec![true, false]);
    }

    #[test]
    fn test_continuous_strike_not_triggerable() {
        let (mut task, mut user) = started(Probe::new(0.5, StrikeTiming::Continuous));
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);

        assert!(!task.strike(&mut user, &mut ctx));
        assert_eq!(task.kind(), AbilityKind::Chomp);
    }
}
