//! Chomp: укус перед собой. Без движения, один удар за прогон.

use bevy::prelude::*;

use crate::abilities::{
    aim_direction, face_direction, flat_forward, strike_area, Ability, AbilityContext,
    AbilityDescriptor, AbilityExit, AbilityUser, StepResult, StrikeArea,
};

#[derive(Debug, Clone)]
pub struct Chomp {
    descriptor: AbilityDescriptor,
}

impl Chomp {
    pub fn new(descriptor: AbilityDescriptor) -> Self {
        Self { descriptor }
    }

    /// Пасть: `range` метров перед агентом, по горизонтали
    pub fn mouth_position(&self, transform: &Transform) -> Vec3 {
        transform.translation + flat_forward(transform) * self.descriptor.range
    }
}

impl Ability for Chomp {
    fn descriptor(&self) -> &AbilityDescriptor {
        &self.descriptor
    }

    fn begin(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let body = user.body();

        if ctx.target.is_some() {
            let direction = aim_direction(body.transform, ctx.target);
            face_direction(body.transform, direction);
        }
        ctx.cue("chomp_start", body.transform.translation, boss);
    }

    fn step(&mut self, _user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>) -> StepResult {
        StepResult::Continue
    }

    fn trigger_strike(&mut self, user: &mut dyn AbilityUser, ctx: &mut AbilityContext<'_>) {
        let boss = user.is_boss_variant();
        let mouth = self.mouth_position(user.body().transform);

        ctx.cue("chomp", mouth, boss);
        strike_area(
            ctx,
            StrikeArea {
                center: mouth,
                radius: self.descriptor.radius,
                force: self.descriptor.force,
                health_damage_ratio: self.descriptor.health_damage_ratio,
                lift: None,
                flatten: true,
            },
        );
    }

    fn end(&mut self, _user: &mut dyn AbilityUser, _ctx: &mut AbilityContext<'_>, _exit: AbilityExit) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::test_support::*;
    use crate::abilities::{AbilityKind, ImpactCommand};
    use crate::execution::AbilityTask;
    use crate::physics::{Capabilities, CollisionEntry, CollisionWorld};
    use bevy_rapier3d::prelude::Collider;

    #[test]
    fn test_chomp_bites_in_front_with_flat_force() {
        let npc = Entity::from_raw(3);
        let behind = Entity::from_raw(4);
        let world = CollisionWorld::new(vec![
            // Перед пастью, чуть выше
            CollisionEntry::new(npc, Collider::ball(0.5), Vec3::new(0.0, 3.0, -5.0))
                .with_capabilities(Capabilities::MORTAL),
            // За спиной, дальше радиуса от пасти
            CollisionEntry::new(behind, Collider::ball(0.5), Vec3::new(0.0, 0.0, 6.0))
                .with_capabilities(Capabilities::MORTAL),
        ]);
        let mut effects = Vec::new();
        let mut user = TestUser::boss_at(Vec3::ZERO);
        let descriptor = AbilityDescriptor::standard(AbilityKind::Chomp, 2.0);
        let mut task = AbilityTask::new(Box::new(Chomp::new(descriptor)));

        let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
        task.begin(&mut user, &mut ctx);
        for _ in 0..60 {
            let mut ctx = AbilityContext::new(&world, self_entity(), DT, 0.0, &mut effects);
            if task.tick(&mut user, &mut ctx).is_some() {
                break;
            }
        }

        let impacts = impacts_on(&effects, npc);
        assert_eq!(impacts.len(), 1);
        let ImpactCommand::Kill { force } = impacts[0] else {
            panic!("expected kill, got {:?}", impacts[0]);
        };
        assert_eq!(force.y, 0.0);
        assert!(force.z < 0.0);

        assert!(impacts_on(&effects, behind).is_empty());
    }
}
