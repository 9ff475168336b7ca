//! Kaiju Simulation Core
//!
//! Headless ECS-симуляция боя кайдзю на Bevy 0.16:
//! boss AI decision loop + ability state machine.
//!
//! Тик (FixedUpdate, 60Hz), SimulationSet по порядку:
//! Perception → Decision → Execution → Impacts → Lifecycle → Movement
//!
//! Клиент (рендер, audio, vfx, UI): снаружи, слушает события:
//! FeedbackEvent, HealthChanged, GameOutcome, ComboChanged.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod abilities;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod execution;
pub mod logger;
pub mod physics;
pub mod spawn;

// Re-export базовых типов для удобства
pub use abilities::{AbilityKind, AbilityLoadout, FeedbackEvent, ImpactEvent};
pub use ai::{AIPlugin, BossAIState, BossBrain, BossConfig, Formation};
pub use combat::{
    ComboChanged, ComboTier, CombatPlugin, DamageDealt, DamageEvent, Dead, DeathSequence, EntityDied, GameOutcome,
    HealthChanged, KillCombo, LifeState, MatchResult, Ragdoll,
};
pub use components::*;
pub use config::{ConfigError, SimulationConfig, Tuning};
pub use execution::{
    AbilityCooldowns, AbilityEndReason, AbilityEnded, AbilityExecutor, AbilityRequest, ExecutionPlugin, LaunchRejected,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::PhysicsPlugin;
pub use spawn::{spawn_arena_scene, spawn_boss, spawn_building, spawn_crowd_member, spawn_player, ArenaScene};

/// Фазы fixed тика (строго последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Снимок коллайдеров для запросов
    Perception,
    /// Цели + boss decision tick
    Decision,
    /// Запуск и шаг abilities
    Execution,
    /// Удары → здания / толпа / Health
    Impacts,
    /// Ragdoll, death sequence, despawn
    Lifecycle,
    /// Интеграция kinematic тел + кламп арены
    Movement,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub tuning: Tuning,
}

impl SimulationPlugin {
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self { tuning }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let simulation = self.tuning.simulation;

        app
            // Fixed timestep (60Hz по умолчанию) для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(simulation.tick_hz))
            // Детерминистичный RNG (seed из тюнинга)
            .insert_resource(DeterministicRng::new(simulation.seed))
            .insert_resource(self.tuning.arena)
            .insert_resource(self.tuning.clone())
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Perception,
                    SimulationSet::Decision,
                    SimulationSet::Execution,
                    SimulationSet::Impacts,
                    SimulationSet::Lifecycle,
                    SimulationSet::Movement,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((PhysicsPlugin, AIPlugin, ExecutionPlugin, CombatPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (дефолтный тюнинг, свой seed)
pub fn create_headless_app(seed: u64) -> App {
    let mut tuning = Tuning::default();
    tuning.simulation.seed = seed;
    create_headless_app_with(tuning)
}

/// Headless App с заданным тюнингом.
///
/// Время шагает вручную: каждый `app.update()` = ровно один fixed тик
/// (кроме первого update, у него delta = 0).
pub fn create_headless_app_with(tuning: Tuning) -> App {
    let mut app = App::new();
    init_logger();

    let tick = Duration::from_secs_f64(1.0 / tuning.simulation.tick_hz);
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin::with_tuning(tuning))
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
