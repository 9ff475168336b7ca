//! Boss decision tick (чистая функция, без ECS)
//!
//! Приоритеты за тик:
//! 1. ExecutingAbility: ждём конца ability
//! 2. Fleeing: бежим до конца flee_duration
//! 3. Нет цели / вне detection range → Idle
//! 4. Низкое здоровье + decision gate открыт → Fleeing
//! 5. Positioning
//! 6. Выбор ability (gate открыт, в attack range, не busy)

use bevy::prelude::*;
use rand::Rng;

use crate::abilities::{AbilityKind, AbilityLoadout};
use crate::ai::positioning::{flat_distance, flee_point, positioning_velocity, velocity_toward, PositioningMode};
use crate::ai::selection::{select_ability, BuildingScan, SelectionContext};
use crate::ai::{BossAIState, BossBrain, BossConfig, Formation};
use crate::components::Arena;
use crate::execution::AbilityCooldowns;

/// Что босс видит на этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionInput {
    pub now: f32,
    pub dt: f32,
    pub position: Vec3,
    /// Позиция цели (None: цели нет)
    pub target: Option<Vec3>,
    pub health_fraction: f32,
    /// Агент занят ability (busy флаг или активный executor)
    pub busy: bool,
    /// Слот + общий поворот (радианы), если боссов ≥ 2
    pub formation: Option<(Formation, f32)>,
    pub buildings: BuildingScan,
}

/// Неизменяемый тюнинг тика
pub struct DecisionTuning<'a> {
    pub config: &'a BossConfig,
    pub loadout: &'a AbilityLoadout,
    pub arena: &'a Arena,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Facing {
    /// Не трогаем rotation (ability или Idle)
    Keep,
    /// Плавный доворот к точке
    Toward(Vec3),
    /// Вращение вокруг Y, градусы в секунду
    Spin(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchOrder {
    pub kind: AbilityKind,
    pub aim: Vec3,
    pub forced: bool,
}

/// Результат тика
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Горизонтальная скорость (None: тело принадлежит ability)
    pub velocity: Option<Vec3>,
    pub facing: Facing,
    pub launch: Option<LaunchOrder>,
    pub started_fleeing: bool,
    pub positioning: Option<PositioningMode>,
}

impl Decision {
    fn hold() -> Self {
        Self {
            velocity: None,
            facing: Facing::Keep,
            launch: None,
            started_fleeing: false,
            positioning: None,
        }
    }

    fn stop() -> Self {
        Self {
            velocity: Some(Vec3::ZERO),
            ..Self::hold()
        }
    }

    fn flee(input: &DecisionInput, point: Vec3, config: &BossConfig) -> Self {
        Self {
            velocity: Some(velocity_toward(input.position, point, config.flee_speed, input.dt)),
            facing: Facing::Spin(config.flee_spin_speed),
            ..Self::hold()
        }
    }
}

/// Один decision tick boss AI.
pub fn think<R: Rng + ?Sized>(
    input: &DecisionInput,
    brain: &mut BossBrain,
    cooldowns: &mut AbilityCooldowns,
    tuning: &DecisionTuning<'_>,
    rng: &mut R,
) -> Decision {
    let config = tuning.config;

    if let BossAIState::ExecutingAbility { kind } = brain.state {
        if input.busy {
            return Decision::hold();
        }
        brain.state = BossAIState::Positioning;
        if kind == AbilityKind::Roll {
            brain.seeking_buildings = false;
        }
    }

    if let BossAIState::Fleeing { started_at, point } = brain.state {
        if input.now >= started_at + config.flee_duration {
            brain.state = BossAIState::Positioning;
            return Decision::stop();
        }
        return Decision::flee(input, point, config);
    }

    let Some(target) = input.target else {
        brain.state = BossAIState::Idle;
        return Decision::stop();
    };
    let distance = flat_distance(input.position, target);
    if distance > config.detection_range {
        brain.state = BossAIState::Idle;
        return Decision::stop();
    }

    if brain.state == BossAIState::Idle {
        brain.state = BossAIState::Positioning;
    }

    if input.health_fraction <= config.flee_threshold && cooldowns.decision_gate_open(input.now) {
        let point = flee_point(input.position, target, config, tuning.arena);
        brain.state = BossAIState::Fleeing {
            started_at: input.now,
            point,
        };
        cooldowns.delay_decisions_until(input.now + config.flee_duration + config.flee_recovery);
        return Decision {
            started_fleeing: true,
            ..Decision::flee(input, point, config)
        };
    }

    let formation = input.formation.as_ref().map(|(slot, rotation)| (slot, *rotation));
    let (mode, velocity) =
        positioning_velocity(input.position, target, formation, config, tuning.arena, input.dt);
    let mut decision = Decision {
        velocity: Some(velocity),
        facing: Facing::Toward(target),
        launch: None,
        started_fleeing: false,
        positioning: Some(mode),
    };

    if !cooldowns.decision_gate_open(input.now) || distance > config.attack_range || input.busy {
        return decision;
    }

    let selection = {
        let ctx = SelectionContext {
            distance,
            target,
            now: input.now,
            buildings: input.buildings,
            last_ability: brain.last_ability,
            loadout: tuning.loadout,
            cooldowns,
            config,
        };
        select_ability(&ctx, rng)
    };

    if let Some(selection) = selection {
        brain.last_ability = Some(selection.kind);
        brain.state = BossAIState::ExecutingAbility { kind: selection.kind };
        if selection.forced {
            brain.seeking_buildings = true;
        }
        cooldowns.delay_decisions_until(input.now + config.decision_interval);

        decision.velocity = Some(Vec3::ZERO);
        decision.launch = Some(LaunchOrder {
            kind: selection.kind,
            aim: selection.aim,
            forced: selection.forced,
        });
    }

    decision
}
