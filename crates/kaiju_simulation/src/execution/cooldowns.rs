//! Cooldown/Timing tracker
//!
//! Per-ability timestamps последнего запуска + общий "next decision" gate.
//! Оба сравниваются с fixed clock (Time<Fixed>::elapsed_secs).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityKind;

/// "Никогда не использовалась": далеко в прошлом, всё доступно с первого тика
pub const NEVER_USED: f32 = -1.0e6;

#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct AbilityCooldowns {
    pub last_used: [f32; AbilityKind::COUNT],
    /// Глобальный темп: раньше этого момента новую ability не выбираем
    pub next_decision_at: f32,
}

impl Default for AbilityCooldowns {
    fn default() -> Self {
        Self {
            last_used: [NEVER_USED; AbilityKind::COUNT],
            next_decision_at: NEVER_USED,
        }
    }
}

impl AbilityCooldowns {
    /// Eligible iff now >= last_used + cooldown (ровно на T + cooldown уже можно)
    pub fn is_ready(&self, kind: AbilityKind, cooldown: f32, now: f32) -> bool {
        now >= self.ready_at(kind, cooldown)
    }

    pub fn ready_at(&self, kind: AbilityKind, cooldown: f32) -> f32 {
        self.last_used[kind.index()] + cooldown
    }

    pub fn remaining(&self, kind: AbilityKind, cooldown: f32, now: f32) -> f32 {
        (self.ready_at(kind, cooldown) - now).max(0.0)
    }

    pub fn mark_used(&mut self, kind: AbilityKind, now: f32) {
        self.last_used[kind.index()] = now;
    }

    pub fn last_used(&self, kind: AbilityKind) -> Option<f32> {
        let at = self.last_used[kind.index()];
        (at > NEVER_USED).then_some(at)
    }

    pub fn decision_gate_open(&self, now: f32) -> bool {
        now >= self.next_decision_at
    }

    pub fn delay_decisions_until(&mut self, at: f32) {
        self.next_decision_at = at;
    }
}
