//! Execution coordinator
//!
//! - task: AbilityTask (Idle → Active → Completing | Aborted), один шаг за тик
//! - cooldowns: per-ability timestamps + общий next-decision gate
//! - executor: AbilityExecutor component, правила запуска (busy / loadout / cooldown)
//! - systems: AbilityRequest → запуск, шаг активных abilities, abort при смерти/ragdoll
//!
//! Abilities пишут эффекты в буфер, здесь буфер превращается в
//! ImpactEvent / FeedbackEvent (обрабатывает combat).

use bevy::prelude::*;

use crate::abilities::{FeedbackEvent, ImpactEvent};
use crate::SimulationSet;

pub mod cooldowns;
pub mod events;
pub mod executor;
pub mod systems;
pub mod task;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod task_tests;

// Re-exports для удобного импорта
pub use cooldowns::{AbilityCooldowns, NEVER_USED};
pub use events::{AbilityEndReason, AbilityEnded, AbilityRequest, AbilityStrikeCue};
pub use executor::{AbilityExecutor, LaunchRejected};
pub use systems::{flush_effects, launch_requested_abilities, step_active_abilities};
pub use task::{AbilityTask, TaskPhase};

/// Execution Plugin
///
/// Порядок (SimulationSet::Execution):
/// 1. launch_requested_abilities: запросы от AI / input
/// 2. step_active_abilities: первый шаг выполняется в тот же тик, что и запуск
pub struct ExecutionPlugin;

impl Plugin for ExecutionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AbilityRequest>()
            .add_event::<AbilityEnded>()
            .add_event::<AbilityStrikeCue>()
            .add_event::<ImpactEvent>()
            .add_event::<FeedbackEvent>()
            .register_type::<AbilityCooldowns>();

        app.add_systems(
            FixedUpdate,
            (launch_requested_abilities, step_active_abilities)
                .chain()
                .in_set(SimulationSet::Execution),
        );
    }
}
