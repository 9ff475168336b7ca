//! Ragdoll: короткая потеря контроля от сильного удара, навсегда после смерти.
//!
//! Сама физика костей: во внешнем клиенте. Симуляции важен только флаг:
//! пока ragdoll активен, AI заморожен, а активная ability прерывается.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub enum RagdollState {
    #[default]
    Inactive,
    Transient {
        until: f32,
    },
    Permanent,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Ragdoll {
    /// Минимальный удар (до damage_scale), включающий ragdoll
    pub threshold: f32,
    /// Длительность transient ragdoll
    pub duration: f32,
    pub state: RagdollState,
}

impl Default for Ragdoll {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            duration: 0.5,
            state: RagdollState::Inactive,
        }
    }
}

impl Ragdoll {
    /// Удар `amount`: true если ragdoll (пере)запущен. Повторный удар перезапускает таймер.
    pub fn trigger(&mut self, amount: f32, now: f32) -> bool {
        if amount < self.threshold || self.state == RagdollState::Permanent {
            return false;
        }
        self.state = RagdollState::Transient {
            until: now + self.duration,
        };
        true
    }

    pub fn is_active(&self) -> bool {
        self.state != RagdollState::Inactive
    }

    /// true если transient ragdoll закончился на этом тике
    pub fn tick(&mut self, now: f32) -> bool {
        match self.state {
            RagdollState::Transient { until } if now >= until => {
                self.state = RagdollState::Inactive;
                true
            }
            _ => false,
        }
    }

    pub fn make_permanent(&mut self) {
        self.state = RagdollState::Permanent;
    }
}

/// Система: снимает истёкший transient ragdoll
pub fn recover_ragdolls(mut ragdolls: Query<(Entity, &mut Ragdoll)>, time: Res<Time<Fixed>>) {
    let now = time.elapsed_secs();

    for (entity, mut ragdoll) in ragdolls.iter_mut() {
        if !ragdoll.is_active() {
            continue;
        }
        if ragdoll.tick(now) {
            crate::logger::log(&format!("🧍 {:?} recovered from ragdoll", entity));
        }
    }
}
