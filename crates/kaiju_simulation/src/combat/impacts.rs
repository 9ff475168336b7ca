//! Impact dispatch: ImpactEvent → владелец цели
//!
//! - ApplyForce → Destructible (первый удар валит здание: Fixed → Dynamic)
//! - ApplyImpulse → ExternalImpulse rigid body
//! - Kill → NPC толпы: Dead, отлёт, деспавн через 5 с
//! - ApplyDamage → DamageEvent (дальше apply_damage)
//!
//! Импульсы за тик суммируются и пишутся одним ExternalImpulse на entity.

use std::collections::BTreeMap;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Ccd, ExternalImpulse, RigidBody};
use rand::Rng;

use crate::abilities::{FeedbackEvent, ImpactCommand, ImpactEvent};
use crate::combat::{DamageEvent, Dead, DespawnAfter, EntityDied};
use crate::components::{CrowdMember, Destructible};
use crate::DeterministicRng;

/// Через сколько удаляется сбитый NPC
pub const CROWD_CORPSE_LIFETIME: f32 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PendingImpulse {
    impulse: Vec3,
    torque: Vec3,
}

/// Случайный вектор внутри единичной сферы (rejection sampling)
pub fn random_in_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if candidate.length_squared() <= 1.0 {
            return candidate;
        }
    }
}

/// Система: раздаёт удары abilities владельцам целей
#[allow(clippy::too_many_arguments)]
pub fn dispatch_impacts(
    mut commands: Commands,
    mut impacts: EventReader<ImpactEvent>,
    mut destructibles: Query<(&mut Destructible, &Transform)>,
    crowd: Query<&Transform, (With<CrowdMember>, Without<Dead>)>,
    mut external_impulses: Query<&mut ExternalImpulse>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut damage_events: EventWriter<DamageEvent>,
    mut entity_died: EventWriter<EntityDied>,
    mut cues: EventWriter<FeedbackEvent>,
) {
    let now = time.elapsed_secs();
    let mut pending: BTreeMap<Entity, PendingImpulse> = BTreeMap::new();
    let mut killed: Vec<Entity> = Vec::new();

    for event in impacts.read() {
        match event.command {
            ImpactCommand::ApplyForce { force, point } => {
                let Ok((mut building, transform)) = destructibles.get_mut(event.target) else {
                    continue;
                };

                if building.register_hit(force) {
                    commands
                        .entity(event.target)
                        .try_insert((RigidBody::Dynamic, Ccd::enabled()));
                    cues.write(FeedbackEvent {
                        name: "building_collapse",
                        position: transform.translation,
                        boss_variant: false,
                    });
                    crate::logger::log(&format!(
                        "🏢 Building {:?} knocked down (hit at {:?})",
                        event.target, point
                    ));
                }

                let torque = random_in_unit_sphere(&mut rng.rng) * building.push_force;
                let entry = pending.entry(event.target).or_default();
                entry.impulse += force;
                entry.torque += torque;
            }
            ImpactCommand::ApplyImpulse { impulse } => {
                pending.entry(event.target).or_default().impulse += impulse;
            }
            ImpactCommand::Kill { force } => {
                if killed.contains(&event.target) {
                    continue;
                }
                let Ok(transform) = crowd.get(event.target) else {
                    continue;
                };

                killed.push(event.target);
                pending.entry(event.target).or_default().impulse += force;
                commands.entity(event.target).try_insert((
                    Dead,
                    RigidBody::Dynamic,
                    DespawnAfter {
                        despawn_time: now + CROWD_CORPSE_LIFETIME,
                    },
                ));
                cues.write(FeedbackEvent {
                    name: "npc_death",
                    position: transform.translation,
                    boss_variant: false,
                });
                entity_died.write(EntityDied {
                    entity: event.target,
                    killer: Some(event.source),
                });
            }
            ImpactCommand::ApplyDamage { amount } => {
                damage_events.write(DamageEvent {
                    source: Some(event.source),
                    target: event.target,
                    amount,
                });
            }
        }
    }

    for (entity, impulse) in pending {
        if let Ok(mut external) = external_impulses.get_mut(entity) {
            external.impulse += impulse.impulse;
            external.torque_impulse += impulse.torque;
        } else {
            commands.entity(entity).try_insert(ExternalImpulse {
                impulse: impulse.impulse,
                torque_impulse: impulse.torque,
            });
        }
    }

    if !killed.is_empty() {
        crate::logger::log(&format!("☠️ {} crowd NPC(s) killed", killed.len()));
    }
}
