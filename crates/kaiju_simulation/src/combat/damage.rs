//! Damage: Health + LifeState + Ragdoll реакция на удар

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use crate::abilities::FeedbackEvent;
use crate::combat::{Dead, EntityDied, LifeState, Ragdoll};
use crate::components::{Agent, Health, PhysicsBody, Player};

/// Событие: удар по Health (до damage_scale цели)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub source: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
}

/// Событие: урон реально нанесён (после damage_scale)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
}

/// Событие для UI: новая доля здоровья
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub fraction: f32,
}

/// Итог одного удара
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// Снято здоровья (после damage_scale)
    pub dealt: f32,
    pub fraction: f32,
    pub ragdolled: bool,
    pub died: bool,
}

/// TakeDamage для Alive. Вне Alive: None (double death и урон трупу: no-op).
///
/// Ragdoll проверяется по входящему `amount` и только если цель выжила.
pub fn resolve_damage(
    health: &mut Health,
    life: &mut LifeState,
    ragdoll: Option<&mut Ragdoll>,
    amount: f32,
    now: f32,
) -> Option<DamageOutcome> {
    if !life.is_alive() {
        return None;
    }

    let dealt = health.take_damage(amount);
    let died = !health.is_alive();

    let ragdolled = match ragdoll {
        Some(ragdoll) if !died => ragdoll.trigger(amount, now),
        _ => false,
    };

    if died {
        *life = LifeState::Dying { since: now };
    }

    Some(DamageOutcome {
        dealt,
        fraction: health.fraction(),
        ragdolled,
        died,
    })
}

/// Система: DamageEvent → Health
///
/// Side effects на удар: HealthChanged (UI), hit cue, camera shake (игрок),
/// DamageDealt; при смерти Dead + остановка тела + EntityDied.
#[allow(clippy::too_many_arguments)]
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut targets: Query<(
        &mut Health,
        &mut LifeState,
        Option<&mut Ragdoll>,
        Option<&mut PhysicsBody>,
        Option<&Agent>,
        &Transform,
        Has<Player>,
    )>,
    time: Res<Time<Fixed>>,
    mut health_changed: EventWriter<HealthChanged>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
    mut cues: EventWriter<FeedbackEvent>,
) {
    let now = time.elapsed_secs();

    for event in damage_events.read() {
        let Ok((mut health, mut life, ragdoll, body, agent, transform, is_player)) = targets.get_mut(event.target) else {
            continue;
        };

        let Some(outcome) = resolve_damage(&mut health, &mut life, ragdoll.map(|r| r.into_inner()), event.amount, now) else {
            continue;
        };

        let boss_variant = agent.is_some_and(Agent::is_boss_variant);
        let position = transform.translation;

        health_changed.write(HealthChanged {
            entity: event.target,
            fraction: outcome.fraction,
        });
        cues.write(FeedbackEvent {
            name: if boss_variant { "boss_hit" } else { "player_hit" },
            position,
            boss_variant,
        });
        if is_player {
            cues.write(FeedbackEvent {
                name: "camera_shake",
                position,
                boss_variant,
            });
        }
        damage_dealt.write(DamageDealt {
            attacker: event.source,
            target: event.target,
            damage: outcome.dealt,
        });

        crate::logger::log(&format!(
            "💥 {:?} took {:.2} damage (HP {:.1}/{:.1})",
            event.target, outcome.dealt, health.current, health.max
        ));

        if outcome.ragdolled {
            crate::logger::log(&format!("🤸 {:?} ragdolled", event.target));
        }

        if outcome.died {
            if let Some(mut body) = body {
                body.velocity = Vec3::ZERO;
                body.move_target = None;
            }
            commands.entity(event.target).insert((Dead, Velocity::zero()));
            entity_died.write(EntityDied {
                entity: event.target,
                killer: event.source,
            });
            crate::logger::log(&format!("💀 {:?} died", event.target));
        }
    }
}
