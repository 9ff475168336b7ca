//! Life cycle: Alive → Dying → Defeated → (despawn)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Состояние жизни агента.
///
/// Урон принимается только в Alive. Dying: скриптовая "смерть"
/// (босс танцует), Defeated: permanent ragdoll, ждём удаления.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub enum LifeState {
    #[default]
    Alive,
    Dying {
        since: f32,
    },
    Defeated,
}

impl LifeState {
    pub fn is_alive(&self) -> bool {
        matches!(self, LifeState::Alive)
    }
}

/// Сценарий смерти агента.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DeathSequence {
    /// Сколько длится Dying до финального импульса
    pub duration: f32,
    /// Скорость вверх при переходе в ragdoll
    pub final_impulse: f32,
    /// Через сколько после Defeated удалить entity (None: никогда)
    pub removal_delay: Option<f32>,
    /// Взрыв в конце (cue "explosion")
    pub explodes: bool,
}

impl Default for DeathSequence {
    fn default() -> Self {
        Self::player()
    }
}

impl DeathSequence {
    /// Босс: 5 с танца, взрыв, подброс 20, удаление через 10 с
    pub fn boss() -> Self {
        Self {
            duration: 5.0,
            final_impulse: 20.0,
            removal_delay: Some(10.0),
            explodes: true,
        }
    }

    /// Игрок: сразу ragdoll с подбросом 5, тело остаётся
    pub fn player() -> Self {
        Self {
            duration: 0.0,
            final_impulse: 5.0,
            removal_delay: None,
            explodes: false,
        }
    }
}

/// Компонент-маркер: entity мертв (агент в Dying/Defeated или сбитый NPC)
///
/// Мёртвые не получают Kill, не двигаются симуляцией, не выбираются целью.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Компонент-маркер: деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах fixed clock)
    pub despawn_time: f32,
}

/// Событие: entity умер (health → 0 или NPC сбит)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Исход боя (один раз на агента, первый исход фиксируется в MatchResult)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    BossDefeated { boss: Entity },
    PlayerDied { player: Entity },
}

/// Resource: первый исход матча
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchResult(pub Option<GameOutcome>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_alive_is_alive() {
        assert!(LifeState::default().is_alive());
        assert!(!LifeState::Dying { since: 1.0 }.is_alive());
        assert!(!LifeState::Defeated.is_alive());
    }

    #[test]
    fn test_boss_and_player_sequences() {
        let boss = DeathSequence::boss();
        assert_eq!(boss.duration, 5.0);
        assert_eq!(boss.removal_delay, Some(10.0));

        let player = DeathSequence::default();
        assert_eq!(player, DeathSequence::player());
        assert_eq!(player.final_impulse, 5.0);
        assert!(player.removal_delay.is_none());
    }
}
