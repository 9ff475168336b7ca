//! AbilityExecutor: слот активной ability агента + правила запуска

use bevy::prelude::*;
use thiserror::Error;

use crate::abilities::{build_ability, AbilityContext, AbilityExit, AbilityKind, AbilityLoadout, AbilityUser};
use crate::execution::{AbilityCooldowns, AbilityTask};

/// Почему запуск отклонён. Запрос не ставится в очередь.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchRejected {
    #[error("agent is busy with another ability")]
    Busy,

    #[error("{kind} on cooldown for {remaining:.2}s")]
    OnCooldown { kind: AbilityKind, remaining: f32 },

    #[error("{0} is not in the loadout")]
    MissingAbility(AbilityKind),

    #[error("agent is dead or ragdolling")]
    Incapacitated,
}

/// Component: loadout + не больше одной активной ability.
#[derive(Component, Debug)]
#[require(AbilityCooldowns)]
pub struct AbilityExecutor {
    pub loadout: AbilityLoadout,
    active: Option<AbilityTask>,
}

impl Default for AbilityExecutor {
    fn default() -> Self {
        Self::new(AbilityLoadout::empty())
    }
}

impl AbilityExecutor {
    pub fn new(loadout: AbilityLoadout) -> Self {
        Self {
            loadout,
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<AbilityKind> {
        self.active.as_ref().map(AbilityTask::kind)
    }

    /// Проверки по порядку: busy → есть в loadout → cooldown.
    ///
    /// Cooldown отмечается в момент запуска (`ctx.now`).
    pub fn try_launch(
        &mut self,
        kind: AbilityKind,
        cooldowns: &mut AbilityCooldowns,
        user: &mut dyn AbilityUser,
        ctx: &mut AbilityContext<'_>,
    ) -> Result<(), LaunchRejected> {
        if self.active.is_some() || user.is_busy() {
            return Err(LaunchRejected::Busy);
        }

        let Some(descriptor) = self.loadout.get(kind).copied() else {
            return Err(LaunchRejected::MissingAbility(kind));
        };

        if !cooldowns.is_ready(kind, descriptor.cooldown, ctx.now) {
            return Err(LaunchRejected::OnCooldown {
                kind,
                remaining: cooldowns.remaining(kind, descriptor.cooldown, ctx.now),
            });
        }

        cooldowns.mark_used(kind, ctx.now);

        let mut task = AbilityTask::new(build_ability(descriptor));
        task.begin(user, ctx);
        self.active = Some(task);
        Ok(())
    }

    /// Тик активной ability. По завершении слот освобождается.
    pub fn tick(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> Option<(AbilityKind, AbilityExit)> {
        let task = self.active.as_mut()?;
        let exit = task.tick(user, ctx)?;
        let kind = task.kind();
        self.active = None;
        Some((kind, exit))
    }

    /// Внешний strike cue. false если нечего бить.
    pub fn strike(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> bool {
        match self.active.as_mut() {
            Some(task) => task.strike(user, ctx),
            None => false,
        }
    }

    pub fn abort(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) -> Option<AbilityKind> {
        let mut task = self.active.take()?;
        task.abort(user, ctx)?;
        Some(task.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::test_support::*;
    use crate::physics::CollisionWorld;

    fn context<'a>(world: &'a CollisionWorld, now: f32, effects: &'a mut Vec<crate::abilities::AbilityEffect>) -> AbilityContext<'a> {
        AbilityContext::new(world, self_entity(), DT, now, effects)
    }

    #[test]
    fn test_launch_marks_cooldown_and_blocks_second_launch() {
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut user = TestUser::boss_at(Vec3::ZERO);
        let mut cooldowns = AbilityCooldowns::default();
        let mut executor = AbilityExecutor::new(AbilityLoadout::boss_default());

        let mut ctx = context(&world, 10.0, &mut effects);
        assert!(executor.try_launch(AbilityKind::Chomp, &mut cooldowns, &mut user, &mut ctx).is_ok());
        assert_eq!(executor.active_kind(), Some(AbilityKind::Chomp));
        assert_eq!(cooldowns.last_used(AbilityKind::Chomp), Some(10.0));
        assert!(user.agent.busy);

        assert_eq!(
            executor.try_launch(AbilityKind::DashSlash, &mut cooldowns, &mut user, &mut ctx),
            Err(LaunchRejected::Busy)
        );
        // Отклонённый запуск не трогает cooldown
        assert_eq!(cooldowns.last_used(AbilityKind::DashSlash), None);
    }

    #[test]
    fn test_rejections_are_typed() {
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut user = TestUser::boss_at(Vec3::ZERO);
        let mut cooldowns = AbilityCooldowns::default();
        cooldowns.mark_used(AbilityKind::DashSlash, 9.0);
        let mut executor = AbilityExecutor::new(AbilityLoadout::boss_default().without(AbilityKind::Roll));

        let mut ctx = context(&world, 10.0, &mut effects);
        assert_eq!(
            executor.try_launch(AbilityKind::Roll, &mut cooldowns, &mut user, &mut ctx),
            Err(LaunchRejected::MissingAbility(AbilityKind::Roll))
        );
        assert_eq!(
            executor.try_launch(AbilityKind::DashSlash, &mut cooldowns, &mut user, &mut ctx),
            Err(LaunchRejected::OnCooldown {
                kind: AbilityKind::DashSlash,
                remaining: 3.0
            })
        );
        assert!(!user.agent.busy);
        assert!(!executor.is_active());
    }

    #[test]
    fn test_tick_frees_slot_on_completion() {
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut user = TestUser::player_at(Vec3::ZERO);
        let mut cooldowns = AbilityCooldowns::default();
        let mut executor = AbilityExecutor::new(AbilityLoadout::player_default());

        let mut ctx = context(&world, 0.0, &mut effects);
        executor
            .try_launch(AbilityKind::Chomp, &mut cooldowns, &mut user, &mut ctx)
            .expect("chomp launches");

        let mut finished = None;
        for _ in 0..120 {
            let mut ctx = context(&world, 0.0, &mut effects);
            finished = executor.tick(&mut user, &mut ctx);
            if finished.is_some() {
                break;
            }
        }

        assert_eq!(finished, Some((AbilityKind::Chomp, AbilityExit::Completed)));
        assert!(!executor.is_active());
        assert!(!user.agent.busy);
    }

    #[test]
    fn test_abort_clears_busy() {
        let world = CollisionWorld::default();
        let mut effects = Vec::new();
        let mut user = TestUser::boss_at(Vec3::ZERO);
        let mut cooldowns = AbilityCooldowns::default();
        let mut executor = AbilityExecutor::new(AbilityLoadout::boss_default());

        let mut ctx = context(&world, 0.0, &mut effects);
        executor
            .try_launch(AbilityKind::DashSlash, &mut cooldowns, &mut user, &mut ctx)
            .expect("dash launches");
        assert!(user.body.continuous_collision);

        assert_eq!(executor.abort(&mut user, &mut ctx), Some(AbilityKind::DashSlash));
        assert!(!user.agent.busy);
        assert!(!user.body.continuous_collision);
        assert_eq!(executor.abort(&mut user, &mut ctx), None);
        assert!(!executor.strike(&mut user, &mut ctx));
    }
}
