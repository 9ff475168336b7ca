//! Death sequence: Dying → Defeated → despawn

use bevy::prelude::*;
use bevy_rapier3d::prelude::{RigidBody, Velocity};

use crate::abilities::FeedbackEvent;
use crate::combat::{DeathSequence, DespawnAfter, GameOutcome, LifeState, MatchResult, Ragdoll};
use crate::components::{Agent, Boss, Player};

/// Система: завершает Dying по истечении DeathSequence::duration
///
/// Финал: permanent ragdoll, импульс вверх (rapier берёт тело на себя),
/// cue, GameOutcome, отложенное удаление.
#[allow(clippy::too_many_arguments)]
pub fn advance_death_sequences(
    mut commands: Commands,
    mut dying: Query<(
        Entity,
        &mut LifeState,
        &mut Ragdoll,
        &Transform,
        Option<&DeathSequence>,
        Option<&Agent>,
        Has<Boss>,
        Has<Player>,
    )>,
    time: Res<Time<Fixed>>,
    mut match_result: ResMut<MatchResult>,
    mut cues: EventWriter<FeedbackEvent>,
    mut outcomes: EventWriter<GameOutcome>,
) {
    let now = time.elapsed_secs();

    for (entity, mut life, mut ragdoll, transform, sequence, agent, is_boss, is_player) in dying.iter_mut() {
        let LifeState::Dying { since } = *life else {
            continue;
        };
        let sequence = sequence.copied().unwrap_or_default();
        if now < since + sequence.duration {
            continue;
        }

        *life = LifeState::Defeated;
        ragdoll.make_permanent();
        commands
            .entity(entity)
            .try_insert((RigidBody::Dynamic, Velocity::linear(Vec3::Y * sequence.final_impulse)));

        let boss_variant = agent.is_some_and(Agent::is_boss_variant);
        cues.write(FeedbackEvent {
            name: if sequence.explodes { "explosion" } else { "death" },
            position: transform.translation,
            boss_variant,
        });

        let outcome = if is_boss {
            Some(GameOutcome::BossDefeated { boss: entity })
        } else if is_player {
            Some(GameOutcome::PlayerDied { player: entity })
        } else {
            None
        };
        if let Some(outcome) = outcome {
            outcomes.write(outcome);
            if match_result.0.is_none() {
                match_result.0 = Some(outcome);
                crate::logger::log_info(&format!("🏆 Match over: {:?}", outcome));
            }
        }

        if let Some(delay) = sequence.removal_delay {
            commands.entity(entity).try_insert(DespawnAfter {
                despawn_time: now + delay,
            });
        }

        crate::logger::log(&format!("⚰️ {:?} defeated (Dying since {:.2})", entity, since));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter timeout
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("🗑️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}
