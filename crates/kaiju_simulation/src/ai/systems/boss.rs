//! Boss decision system: think() на каждого живого босса

use bevy::prelude::*;

use crate::abilities::FeedbackEvent;
use crate::ai::decision::{think, DecisionInput, DecisionTuning, Facing};
use crate::ai::positioning::flat_distance;
use crate::ai::selection::BuildingScan;
use crate::ai::{BossBrain, BossConfig, Formation, TargetCache};
use crate::combat::{LifeState, Ragdoll};
use crate::components::{Agent, Arena, Destructible, Health, PhysicsBody};
use crate::execution::{AbilityCooldowns, AbilityExecutor, AbilityRequest};
use crate::DeterministicRng;

/// Поворот к точке по горизонтали (slerp с rate · dt)
pub fn turn_toward(transform: &mut Transform, point: Vec3, turn_rate: f32, dt: f32) {
    let flat = Vec3::new(point.x, transform.translation.y, point.z);
    if flat_distance(transform.translation, flat) <= f32::EPSILON {
        return;
    }
    let goal = transform.looking_at(flat, Vec3::Y).rotation;
    transform.rotation = transform.rotation.slerp(goal, (turn_rate * dt).clamp(0.0, 1.0));
}

/// Система: boss AI decision tick
///
/// Мёртвые и ragdoll боссы заморожены (ничего не пишем в тело).
#[allow(clippy::too_many_arguments)]
pub fn boss_decision(
    mut bosses: Query<(
        Entity,
        &mut BossBrain,
        &mut AbilityCooldowns,
        &BossConfig,
        &AbilityExecutor,
        &TargetCache,
        &Agent,
        &Health,
        &LifeState,
        &Ragdoll,
        &mut Transform,
        &mut PhysicsBody,
        Option<&Formation>,
    )>,
    targets: Query<&Transform, Without<BossBrain>>,
    buildings: Query<(&Transform, &Destructible), Without<BossBrain>>,
    arena: Res<Arena>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut requests: EventWriter<AbilityRequest>,
    mut cues: EventWriter<FeedbackEvent>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    // Formation включается только когда живых боссов ≥ 2
    let coordinating = bosses
        .iter()
        .filter(|(.., life, _, _, _, formation)| life.is_alive() && formation.is_some())
        .count()
        >= 2;

    for (
        entity,
        mut brain,
        mut cooldowns,
        config,
        executor,
        cache,
        agent,
        health,
        life,
        ragdoll,
        mut transform,
        mut body,
        formation,
    ) in bosses.iter_mut()
    {
        if !life.is_alive() || ragdoll.is_active() {
            continue;
        }

        let position = transform.translation;
        let target = cache
            .target
            .and_then(|target| targets.get(target).ok())
            .map(|target_transform| target_transform.translation);

        let scan_radius_sq = config.building_scan_radius * config.building_scan_radius;
        let scan = BuildingScan::from_positions(
            buildings
                .iter()
                .filter(|(building_transform, building)| {
                    !building.knocked_down
                        && building_transform.translation.distance_squared(position) <= scan_radius_sq
                })
                .map(|(building_transform, _)| building_transform.translation),
        );

        let rotation = (config.formation_rotation_speed * now).to_radians();
        let input = DecisionInput {
            now,
            dt,
            position,
            target,
            health_fraction: health.fraction(),
            busy: agent.busy || executor.is_active(),
            formation: formation.filter(|_| coordinating).map(|slot| (*slot, rotation)),
            buildings: scan,
        };
        let tuning = DecisionTuning {
            config,
            loadout: &executor.loadout,
            arena: &arena,
        };

        let previous = brain.state;
        let decision = think(&input, &mut brain, &mut cooldowns, &tuning, &mut rng.rng);

        if previous != brain.state {
            crate::logger::log(&format!("🧠 Boss {:?}: {:?} → {:?}", entity, previous, brain.state));
        }

        if let Some(velocity) = decision.velocity {
            body.set_horizontal_velocity(velocity);
        }

        match decision.facing {
            Facing::Keep => {}
            Facing::Toward(point) => turn_toward(&mut transform, point, config.turn_rate, dt),
            Facing::Spin(degrees_per_second) => {
                transform.rotate_y((degrees_per_second * dt).to_radians());
            }
        }

        if decision.started_fleeing {
            cues.write(FeedbackEvent {
                name: "flee_start",
                position,
                boss_variant: true,
            });
        }

        if let Some(order) = decision.launch {
            if order.forced {
                crate::logger::log(&format!("🏢 Boss {:?} rolls through buildings ({} nearby)", entity, scan.count));
            }
            requests.write(AbilityRequest {
                entity,
                kind: order.kind,
                target: Some(order.aim),
            });
        }
    }
}
