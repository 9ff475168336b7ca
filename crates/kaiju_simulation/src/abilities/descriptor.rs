//! Ability descriptors и loadout (неизменяемый тюнинг)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Пять способностей. Порядок = индекс в таблице cooldowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum AbilityKind {
    DashSlash,
    JumpSlam,
    BeamSweep,
    Roll,
    Chomp,
}

impl AbilityKind {
    pub const COUNT: usize = 5;

    pub const ALL: [AbilityKind; Self::COUNT] = [
        AbilityKind::DashSlash,
        AbilityKind::JumpSlam,
        AbilityKind::BeamSweep,
        AbilityKind::Roll,
        AbilityKind::Chomp,
    ];

    pub fn index(self) -> usize {
        match self {
            AbilityKind::DashSlash => 0,
            AbilityKind::JumpSlam => 1,
            AbilityKind::BeamSweep => 2,
            AbilityKind::Roll => 3,
            AbilityKind::Chomp => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::DashSlash => "dash_slash",
            AbilityKind::JumpSlam => "jump_slam",
            AbilityKind::BeamSweep => "beam_sweep",
            AbilityKind::Roll => "roll",
            AbilityKind::Chomp => "chomp",
        }
    }
}

impl std::fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Когда ability наносит удар.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum StrikeTiming {
    /// Каждый тик (beam)
    Continuous,
    /// Один раз, когда elapsed >= t (визуальный момент удара)
    AtTime(f32),
    /// Один раз по завершении (приземление)
    OnLanding,
}

/// Параметры одной ability.
///
/// Инварианты (проверяет `validate`): все поля конечные, duration > 0,
/// cooldown >= 0, strike внутри активного окна.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub kind: AbilityKind,
    /// Секунды активной фазы
    pub duration: f32,
    pub cooldown: f32,
    /// Сила удара (для beam: в секунду)
    pub force: f32,
    /// Доля силы, уходящая в урон по Health
    pub health_damage_ratio: f32,
    /// Радиус overlap удара
    pub radius: f32,
    /// Дистанция рывка / прыжка / луча / смещение пасти
    pub range: f32,
    pub strike: StrikeTiming,
}

impl AbilityDescriptor {
    /// Базовый тюнинг ability (cooldown задаёт loadout).
    pub fn standard(kind: AbilityKind, cooldown: f32) -> Self {
        let (duration, force, health_damage_ratio, radius, range, strike) = match kind {
            AbilityKind::DashSlash => (0.3, 1000.0, 0.02, 8.0, 15.0, StrikeTiming::AtTime(0.25)),
            AbilityKind::JumpSlam => (0.8, 2000.0, 0.01, 12.0, 8.0, StrikeTiming::OnLanding),
            AbilityKind::BeamSweep => (4.0, 500.0, 0.02, 0.0, 50.0, StrikeTiming::Continuous),
            AbilityKind::Roll => (0.5, 800.0, 0.05, 5.0, 12.0, StrikeTiming::AtTime(0.25)),
            AbilityKind::Chomp => (0.5, 300.0, 0.1, 5.0, 2.0, StrikeTiming::AtTime(0.25)),
        };

        Self {
            kind,
            duration,
            cooldown,
            force,
            health_damage_ratio,
            radius,
            range,
            strike,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidAbility {
            kind: self.kind,
            reason: reason.to_string(),
        };

        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(invalid("duration must be > 0"));
        }
        if !(self.cooldown.is_finite() && self.cooldown >= 0.0) {
            return Err(invalid("cooldown must be >= 0"));
        }
        let magnitudes = [self.force, self.health_damage_ratio, self.radius, self.range];
        if magnitudes.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(invalid("force, ratio, radius and range must be finite and >= 0"));
        }
        if let StrikeTiming::AtTime(at) = self.strike {
            if !(0.0..=self.duration).contains(&at) {
                return Err(invalid("strike time must lie inside the active window"));
            }
        }
        Ok(())
    }
}

/// Набор abilities агента (не больше одной на kind).
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbilityLoadout {
    abilities: Vec<AbilityDescriptor>,
}

impl AbilityLoadout {
    /// Проверяет descriptors и дубликаты.
    pub fn new(abilities: Vec<AbilityDescriptor>) -> Result<Self, ConfigError> {
        let loadout = Self { abilities };
        loadout.validate()?;
        Ok(loadout)
    }

    pub fn empty() -> Self {
        Self {
            abilities: Vec::new(),
        }
    }

    /// Босс: dash 4s, jump 6s, beam 10s, roll 3s, chomp 2s
    pub fn boss_default() -> Self {
        Self::with_cooldowns([4.0, 6.0, 10.0, 3.0, 2.0])
    }

    /// Игрок: dash 3s, jump 5s, beam 8s, roll 2s, chomp 1s
    pub fn player_default() -> Self {
        Self::with_cooldowns([3.0, 5.0, 8.0, 2.0, 1.0])
    }

    fn with_cooldowns(cooldowns: [f32; AbilityKind::COUNT]) -> Self {
        Self {
            abilities: AbilityKind::ALL
                .iter()
                .map(|kind| AbilityDescriptor::standard(*kind, cooldowns[kind.index()]))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = [false; AbilityKind::COUNT];
        for descriptor in &self.abilities {
            descriptor.validate()?;
            let slot = &mut seen[descriptor.kind.index()];
            if *slot {
                return Err(ConfigError::DuplicateAbility(descriptor.kind));
            }
            *slot = true;
        }
        Ok(())
    }

    pub fn get(&self, kind: AbilityKind) -> Option<&AbilityDescriptor> {
        self.abilities.iter().find(|descriptor| descriptor.kind == kind)
    }

    pub fn contains(&self, kind: AbilityKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn cooldown(&self, kind: AbilityKind) -> Option<f32> {
        self.get(kind).map(|descriptor| descriptor.cooldown)
    }

    pub fn without(mut self, kind: AbilityKind) -> Self {
        self.abilities.retain(|descriptor| descriptor.kind != kind);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDescriptor> {
        self.abilities.iter()
    }
}
