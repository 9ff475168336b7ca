//! Execution systems: запуск по AbilityRequest и пошаговый прогон активных abilities.

use bevy::prelude::*;

use crate::abilities::{AbilityContext, AbilityEffect, AgentHandle, FeedbackEvent, ImpactEvent};
use crate::combat::{LifeState, Ragdoll};
use crate::components::{Agent, PhysicsBody};
use crate::execution::{
    AbilityCooldowns, AbilityEndReason, AbilityEnded, AbilityExecutor, AbilityRequest,
    AbilityStrikeCue, LaunchRejected,
};
use crate::physics::CollisionWorld;

/// Буфер эффектов → события. Источник удара: сам агент.
pub fn flush_effects(
    source: Entity,
    effects: &mut Vec<AbilityEffect>,
    impacts: &mut EventWriter<ImpactEvent>,
    cues: &mut EventWriter<FeedbackEvent>,
) {
    for effect in effects.drain(..) {
        match effect {
            AbilityEffect::Impact { target, command } => {
                impacts.write(ImpactEvent {
                    source,
                    target,
                    command,
                });
            }
            AbilityEffect::Cue(cue) => {
                cues.write(cue);
            }
        }
    }
}

fn incapacitated(life: &LifeState, ragdoll: &Ragdoll) -> bool {
    !life.is_alive() || ragdoll.is_active()
}

/// Система: AbilityRequest → AbilityExecutor::try_launch
///
/// Отклонённые запросы логируются и сразу репортятся через AbilityEnded.
#[allow(clippy::too_many_arguments)]
pub fn launch_requested_abilities(
    mut requests: EventReader<AbilityRequest>,
    mut agents: Query<(
        &mut Agent,
        &mut Transform,
        &mut PhysicsBody,
        &mut AbilityExecutor,
        &mut AbilityCooldowns,
        &LifeState,
        &Ragdoll,
    )>,
    collision_world: Res<CollisionWorld>,
    time: Res<Time<Fixed>>,
    mut impacts: EventWriter<ImpactEvent>,
    mut cues: EventWriter<FeedbackEvent>,
    mut ended: EventWriter<AbilityEnded>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();
    let mut effects = Vec::new();

    for request in requests.read() {
        let Ok((mut agent, mut transform, mut body, mut executor, mut cooldowns, life, ragdoll)) =
            agents.get_mut(request.entity)
        else {
            crate::logger::log_warning(&format!(
                "AbilityRequest for {:?}: no executor on entity, dropped",
                request.entity
            ));
            continue;
        };

        let result = if incapacitated(life, ragdoll) {
            Err(LaunchRejected::Incapacitated)
        } else {
            let mut handle = AgentHandle {
                agent: &mut agent,
                transform: &mut transform,
                body: &mut body,
            };
            let mut ctx = AbilityContext::new(&*collision_world, request.entity, delta, now, &mut effects)
                .with_target(request.target);
            executor.try_launch(request.kind, &mut cooldowns, &mut handle, &mut ctx)
        };

        match result {
            Ok(()) => {
                crate::logger::log(&format!("⚔️ {:?} started {} at t={:.2}", request.entity, request.kind, now));
            }
            Err(reason) => {
                crate::logger::log(&format!("🚫 {:?} {} rejected: {}", request.entity, request.kind, reason));
                ended.write(AbilityEnded {
                    entity: request.entity,
                    kind: request.kind,
                    reason: AbilityEndReason::Rejected(reason),
                });
            }
        }

        flush_effects(request.entity, &mut effects, &mut impacts, &mut cues);
    }
}

/// Система: один шаг каждой активной ability
///
/// Порядок на агента:
/// 1. Смерть / ragdoll → abort (без удара)
/// 2. Внешний AbilityStrikeCue → strike
/// 3. tick (step или cleanup)
#[allow(clippy::too_many_arguments)]
pub fn step_active_abilities(
    mut strike_cues: EventReader<AbilityStrikeCue>,
    mut agents: Query<(
        Entity,
        &mut Agent,
        &mut Transform,
        &mut PhysicsBody,
        &mut AbilityExecutor,
        &LifeState,
        &Ragdoll,
    )>,
    collision_world: Res<CollisionWorld>,
    time: Res<Time<Fixed>>,
    mut impacts: EventWriter<ImpactEvent>,
    mut cues: EventWriter<FeedbackEvent>,
    mut ended: EventWriter<AbilityEnded>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();
    let strike_requests: Vec<Entity> = strike_cues.read().map(|cue| cue.entity).collect();
    let mut effects = Vec::new();

    for (entity, mut agent, mut transform, mut body, mut executor, life, ragdoll) in agents.iter_mut() {
        if !executor.is_active() {
            continue;
        }

        let finished = {
            let mut handle = AgentHandle {
                agent: &mut agent,
                transform: &mut transform,
                body: &mut body,
            };
            let mut ctx = AbilityContext::new(&*collision_world, entity, delta, now, &mut effects);

            if incapacitated(life, ragdoll) {
                executor
                    .abort(&mut handle, &mut ctx)
                    .map(|kind| (kind, AbilityEndReason::Aborted))
            } else {
                if strike_requests.contains(&entity) {
                    executor.strike(&mut handle, &mut ctx);
                }
                executor
                    .tick(&mut handle, &mut ctx)
                    .map(|(kind, exit)| (kind, AbilityEndReason::from(exit)))
            }
        };

        if let Some((kind, reason)) = finished {
            crate::logger::log(&format!("🏁 {:?} {} ended: {:?}", entity, kind, reason));
            ended.write(AbilityEnded { entity, kind, reason });
        }

        flush_effects(entity, &mut effects, &mut impacts, &mut cues);
    }
}
