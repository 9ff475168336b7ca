//! BossConfig: пороги дистанций, flee, темп решений

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Параметры boss AI (per-agent component, дефолт: боевой тюнинг)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct BossConfig {
    /// Дальше этого: Idle (цель не видна)
    pub detection_range: f32,
    /// Ability выбирается только ближе этого
    pub attack_range: f32,
    /// Range buckets: ≤ close / ≤ mid / ≤ far
    pub close_range: f32,
    pub mid_range: f32,
    pub far_range: f32,
    /// Комфортная дистанция (подход если дальше preferred + approach_margin)
    pub preferred_range: f32,
    pub approach_margin: f32,
    /// Отход если ближе close - retreat_margin
    pub retreat_margin: f32,
    pub reposition_speed: f32,
    pub retreat_speed_factor: f32,
    /// Скорость кружения вокруг цели (м/с)
    pub orbit_speed: f32,
    /// Slerp rate поворота к цели
    pub turn_rate: f32,

    /// Health fraction ≤ threshold → Fleeing
    pub flee_threshold: f32,
    pub flee_duration: f32,
    /// Пауза решений после побега (next decision = now + duration + recovery)
    pub flee_recovery: f32,
    pub flee_speed: f32,
    /// Градусы в секунду
    pub flee_spin_speed: f32,
    pub flee_distance: f32,

    /// Минимальный интервал между выбором abilities
    pub decision_interval: f32,
    pub target_refresh_interval: f32,

    /// Forced roll: ≥ building_threshold стоящих зданий в building_scan_radius
    pub building_scan_radius: f32,
    pub building_threshold: usize,
    pub forced_roll_chance: f32,

    /// Formation: общий поворот слотов (градусы в секунду)
    pub formation_rotation_speed: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            detection_range: 50.0,
            attack_range: 30.0,
            close_range: 10.0,
            mid_range: 20.0,
            far_range: 35.0,
            preferred_range: 15.0,
            approach_margin: 5.0,
            retreat_margin: 3.0,
            reposition_speed: 12.0,
            retreat_speed_factor: 0.7,
            orbit_speed: 6.0,
            turn_rate: 5.0,
            flee_threshold: 0.3,
            flee_duration: 3.0,
            flee_recovery: 2.0,
            flee_speed: 20.0,
            flee_spin_speed: 720.0,
            flee_distance: 30.0,
            decision_interval: 5.0,
            target_refresh_interval: 3.0,
            building_scan_radius: 25.0,
            building_threshold: 3,
            forced_roll_chance: 0.5,
            formation_rotation_speed: 10.0,
        }
    }
}

impl BossConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| Err(ConfigError::InvalidBossConfig(reason.to_string()));

        let non_negative = [
            self.detection_range,
            self.attack_range,
            self.close_range,
            self.mid_range,
            self.far_range,
            self.preferred_range,
            self.approach_margin,
            self.retreat_margin,
            self.reposition_speed,
            self.retreat_speed_factor,
            self.orbit_speed,
            self.turn_rate,
            self.flee_duration,
            self.flee_recovery,
            self.flee_speed,
            self.flee_distance,
            self.decision_interval,
            self.target_refresh_interval,
            self.building_scan_radius,
        ];
        if non_negative.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return invalid("distances, speeds and durations must be finite and >= 0");
        }
        if !self.formation_rotation_speed.is_finite() {
            return invalid("formation_rotation_speed must be finite");
        }
        if !(self.close_range <= self.mid_range && self.mid_range <= self.far_range) {
            return invalid("range buckets must satisfy close <= mid <= far");
        }
        if !(0.0..=1.0).contains(&self.flee_threshold) {
            return invalid("flee_threshold must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.forced_roll_chance) {
            return invalid("forced_roll_chance must lie in [0, 1]");
        }
        Ok(())
    }

    pub fn retreat_speed(&self) -> f32 {
        self.reposition_speed * self.retreat_speed_factor
    }
}
