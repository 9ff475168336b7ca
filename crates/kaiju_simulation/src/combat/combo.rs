//! Kill combo: NPC толпы, сбитые игроком подряд
//!
//! Каждое убийство продлевает окно на `timeout`. Окно истекло → счётчик в ноль.
//! UI (панель "12x Combo", надпись уровня) снаружи, слушает ComboChanged.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::EntityDied;
use crate::components::{CrowdMember, Player};

/// Уровень combo (порог убийств)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum ComboTier {
    Nice,
    Great,
    Awesome,
    Amazing,
    Godlike,
}

impl ComboTier {
    pub const ALL: [ComboTier; 5] = [
        ComboTier::Nice,
        ComboTier::Great,
        ComboTier::Awesome,
        ComboTier::Amazing,
        ComboTier::Godlike,
    ];

    pub fn threshold(self) -> u32 {
        match self {
            ComboTier::Nice => 5,
            ComboTier::Great => 10,
            ComboTier::Awesome => 25,
            ComboTier::Amazing => 50,
            ComboTier::Godlike => 100,
        }
    }

    /// Высший достигнутый уровень
    pub fn for_count(count: u32) -> Option<Self> {
        Self::ALL.iter().rev().copied().find(|tier| count >= tier.threshold())
    }
}

/// Событие для UI: combo изменился (count == 0 → сброс)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ComboChanged {
    pub count: u32,
    pub tier: Option<ComboTier>,
}

/// Resource: текущий и лучший combo матча
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct KillCombo {
    pub timeout: f32,
    pub current: u32,
    pub highest: u32,
    /// Fixed clock: после этого момента combo сбрасывается
    pub expires_at: f32,
}

impl Default for KillCombo {
    fn default() -> Self {
        Self {
            timeout: 3.0,
            current: 0,
            highest: 0,
            expires_at: 0.0,
        }
    }
}

impl KillCombo {
    pub fn add_kill(&mut self, now: f32) {
        self.current += 1;
        self.highest = self.highest.max(self.current);
        self.expires_at = now + self.timeout;
    }

    /// true если combo сброшен именно сейчас
    pub fn expire(&mut self, now: f32) -> bool {
        if self.current == 0 || now < self.expires_at {
            return false;
        }
        self.current = 0;
        true
    }

    pub fn tier(&self) -> Option<ComboTier> {
        ComboTier::for_count(self.current)
    }
}

/// Система: EntityDied (NPC толпы, убийца: игрок) → KillCombo
///
/// Сначала истечение окна, потом новые убийства этого тика.
pub fn track_kill_combo(
    mut deaths: EventReader<EntityDied>,
    crowd: Query<(), With<CrowdMember>>,
    players: Query<(), With<Player>>,
    mut combo: ResMut<KillCombo>,
    time: Res<Time<Fixed>>,
    mut changes: EventWriter<ComboChanged>,
) {
    let now = time.elapsed_secs();

    if combo.expire(now) {
        changes.write(ComboChanged { count: 0, tier: None });
    }

    let kills = deaths
        .read()
        .filter(|died| crowd.contains(died.entity))
        .filter(|died| died.killer.is_some_and(|killer| players.contains(killer)))
        .count();
    if kills == 0 {
        return;
    }

    let previous_tier = combo.tier();
    for _ in 0..kills {
        combo.add_kill(now);
    }
    let tier = combo.tier();
    if tier > previous_tier {
        crate::logger::log(&format!("🔥 Combo {}x: {:?}", combo.current, tier));
    }
    changes.write(ComboChanged {
        count: combo.current,
        tier,
    });
}
