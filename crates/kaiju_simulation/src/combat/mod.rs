//! Combat module: удары, урон, ragdoll, смерть
//!
//! ECS ответственность:
//! - Impact dispatch: ImpactEvent от abilities → здания / rigid bodies / толпа / Health
//! - Health/death state machine: Alive → Dying → Defeated → despawn
//! - Ragdoll флаг (transient от сильного удара, permanent после смерти)
//! - Kill combo: NPC, сбитые игроком подряд
//!
//! Клиент (audio/vfx/camera/UI) получает только события:
//! FeedbackEvent, HealthChanged, GameOutcome, ComboChanged.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod combo;
pub mod damage;
pub mod death;
pub mod impacts;
pub mod life;
pub mod ragdoll;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod combat_tests;

// Re-export основных типов
pub use combo::{track_kill_combo, ComboChanged, ComboTier, KillCombo};
pub use damage::{apply_damage, resolve_damage, DamageDealt, DamageEvent, DamageOutcome, HealthChanged};
pub use death::{advance_death_sequences, despawn_after_timeout};
pub use impacts::{dispatch_impacts, random_in_unit_sphere, CROWD_CORPSE_LIFETIME};
pub use life::{DeathSequence, Dead, DespawnAfter, EntityDied, GameOutcome, LifeState, MatchResult};
pub use ragdoll::{recover_ragdolls, Ragdoll, RagdollState};

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. dispatch_impacts: ImpactEvent → владельцы целей (Impacts)
/// 2. apply_damage: DamageEvent → Health, смерть (Impacts)
/// 3. recover_ragdolls: снятие transient ragdoll (Lifecycle)
/// 4. advance_death_sequences: Dying → Defeated (Lifecycle)
/// 5. despawn_after_timeout: уборка (Lifecycle)
/// 6. track_kill_combo: EntityDied → KillCombo (Lifecycle)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageEvent>()
            .add_event::<DamageDealt>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<GameOutcome>()
            .add_event::<ComboChanged>()
            .init_resource::<MatchResult>()
            .init_resource::<KillCombo>()
            .register_type::<LifeState>()
            .register_type::<Ragdoll>()
            .register_type::<DeathSequence>()
            .register_type::<KillCombo>();

        app.add_systems(
            FixedUpdate,
            (dispatch_impacts, apply_damage)
                .chain()
                .in_set(SimulationSet::Impacts),
        )
        .add_systems(
            FixedUpdate,
            (recover_ragdolls, advance_death_sequences, despawn_after_timeout, track_kill_combo)
                .chain()
                .in_set(SimulationSet::Lifecycle),
        );
    }
}
