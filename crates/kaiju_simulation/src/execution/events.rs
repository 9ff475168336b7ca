//! Execution events: запросы на запуск, завершения, внешние strike cues

use bevy::prelude::*;

use crate::abilities::{AbilityExit, AbilityKind};
use crate::execution::LaunchRejected;

/// Запрос на запуск ability (AI, input слой игрока, тестовые сценарии)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AbilityRequest {
    pub entity: Entity,
    pub kind: AbilityKind,
    /// Точка прицеливания (фиксируется при старте)
    pub target: Option<Vec3>,
}

/// Чем закончилась ability (или запрос на неё)
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityEndReason {
    Completed,
    EarlyExit,
    Aborted,
    Rejected(LaunchRejected),
}

impl From<AbilityExit> for AbilityEndReason {
    fn from(exit: AbilityExit) -> Self {
        match exit {
            AbilityExit::Completed => Self::Completed,
            AbilityExit::EarlyExit => Self::EarlyExit,
            AbilityExit::Aborted => Self::Aborted,
        }
    }
}

/// Событие: ability завершилась / запрос отклонён
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AbilityEnded {
    pub entity: Entity,
    pub kind: AbilityKind,
    pub reason: AbilityEndReason,
}

/// Внешний "бей сейчас" (animation event в клиенте)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityStrikeCue {
    pub entity: Entity,
}
