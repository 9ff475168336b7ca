//! Tuning: clock/seed, арена, BossConfig, loadouts
//!
//! Всё имеет Default с боевыми значениями. TOML файл переопределяет
//! только то, что в нём указано; невалидный тюнинг отклоняется при загрузке.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::abilities::{AbilityKind, AbilityLoadout};
use crate::ai::BossConfig;
use crate::components::Arena;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("ability {kind}: {reason}")]
    InvalidAbility { kind: AbilityKind, reason: String },

    #[error("ability {0} listed twice in loadout")]
    DuplicateAbility(AbilityKind),

    #[error("boss config: {0}")]
    InvalidBossConfig(String),

    #[error("simulation config: {0}")]
    InvalidSimulation(String),
}

/// Fixed clock и seed детерминистичного RNG
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_hz: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::InvalidSimulation(format!(
                "tick_hz must be positive, got {}",
                self.tick_hz
            )));
        }
        Ok(())
    }
}

/// Полный тюнинг матча (resource: spawn берёт отсюда конфиг и loadouts)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub simulation: SimulationConfig,
    pub arena: Arena,
    pub boss: BossConfig,
    pub boss_loadout: AbilityLoadout,
    pub player_loadout: AbilityLoadout,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            arena: Arena::default(),
            boss: BossConfig::default(),
            boss_loadout: AbilityLoadout::boss_default(),
            player_loadout: AbilityLoadout::player_default(),
        }
    }
}

impl Tuning {
    /// Парсит и валидирует TOML
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = toml::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        let arena = &self.arena;
        if !(arena.min.is_finite() && arena.max.is_finite() && arena.buffer.is_finite() && arena.buffer >= 0.0) {
            return Err(ConfigError::InvalidSimulation(
                "arena bounds must be finite and buffer >= 0".to_string(),
            ));
        }
        if !arena.inner_min().cmple(arena.inner_max()).all() {
            return Err(ConfigError::InvalidSimulation(
                "arena buffer leaves no room to move".to_string(),
            ));
        }
        self.boss.validate()?;
        self.boss_loadout.validate()?;
        self.player_loadout.validate()?;
        Ok(())
    }
}
