//! Boss AI decision loop
//!
//! - components: BossBrain (FSM), BossConfig, TargetCache, Formation
//! - selection: range buckets, anti-repeat, forced roll через здания
//! - positioning: подход / отход / кружение / formation slot, flee point
//! - decision: think(): один decision tick, чистая функция
//! - systems: acquire_targets, boss_decision (ECS обвязка)
//!
//! Запуск ability: только через AbilityRequest (execution).

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod decision;
pub mod positioning;
pub mod selection;
pub mod systems;


// Re-export основных типов
pub use components::{BossAIState, BossBrain, BossConfig, Formation, TargetCache};
pub use decision::{think, Decision, DecisionInput, DecisionTuning, Facing, LaunchOrder};
pub use positioning::PositioningMode;
pub use selection::{BuildingScan, RangeBucket, Selection};
pub use systems::{acquire_targets, boss_decision};

/// AI Plugin
///
/// Порядок выполнения (SimulationSet::Decision):
/// 1. acquire_targets: перевыбор цели
/// 2. boss_decision: FSM тик, движение, AbilityRequest
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BossBrain>()
            .register_type::<BossConfig>()
            .register_type::<TargetCache>()
            .register_type::<Formation>();

        app.add_systems(
            FixedUpdate,
            (acquire_targets, boss_decision)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Decision),
        );
    }
}
