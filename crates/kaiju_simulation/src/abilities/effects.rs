//! Эффекты abilities: удары по целям и feedback cues
//!
//! Abilities не трогают чужие компоненты напрямую: они пишут
//! `AbilityEffect` в буфер контекста, а execution системы превращают
//! буфер в события (ImpactEvent, FeedbackEvent).

use bevy::prelude::*;

use crate::physics::{Capabilities, WorldQuery};

/// Команда для владельца цели (здание / rigid body / NPC / Health).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactCommand {
    /// Разрушаемое здание: направленная сила в точке
    ApplyForce { force: Vec3, point: Vec3 },
    /// Rigid body: импульс
    ApplyImpulse { impulse: Vec3 },
    /// NPC толпы: смерть с отлётом
    Kill { force: Vec3 },
    /// Health: урон (до damage_scale цели)
    ApplyDamage { amount: f32 },
}

/// Событие: удар ability по цели
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ImpactEvent {
    pub source: Entity,
    pub target: Entity,
    pub command: ImpactCommand,
}

/// Событие: fire-and-forget cue для audio/vfx/camera (по имени).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FeedbackEvent {
    pub name: &'static str,
    pub position: Vec3,
    pub boss_variant: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AbilityEffect {
    Impact { target: Entity, command: ImpactCommand },
    Cue(FeedbackEvent),
}

/// Контекст одного вызова ability (begin/step/strike/end).
pub struct AbilityContext<'a> {
    pub world: &'a dyn WorldQuery,
    pub self_entity: Entity,
    /// Fixed delta
    pub dt: f32,
    pub now: f32,
    /// Сколько ability уже активна (обновляет AbilityTask)
    pub elapsed: f32,
    /// Точка прицеливания, зафиксированная при запуске
    pub target: Option<Vec3>,
    pub effects: &'a mut Vec<AbilityEffect>,
}

impl<'a> AbilityContext<'a> {
    pub fn new(
        world: &'a dyn WorldQuery,
        self_entity: Entity,
        dt: f32,
        now: f32,
        effects: &'a mut Vec<AbilityEffect>,
    ) -> Self {
        Self {
            world,
            self_entity,
            dt,
            now,
            elapsed: 0.0,
            target: None,
            effects,
        }
    }

    pub fn with_target(mut self, target: Option<Vec3>) -> Self {
        self.target = target;
        self
    }

    pub fn cue(&mut self, name: &'static str, position: Vec3, boss_variant: bool) {
        self.effects.push(AbilityEffect::Cue(FeedbackEvent {
            name,
            position,
            boss_variant,
        }));
    }

    pub fn impact(&mut self, target: Entity, command: ImpactCommand) {
        self.effects.push(AbilityEffect::Impact { target, command });
    }

    /// Все команды по цели, в фиксированном порядке, для каждой capability.
    ///
    /// Возвращает true, если хоть одна команда ушла.
    pub fn dispatch(
        &mut self,
        target: Entity,
        capabilities: Capabilities,
        force: Vec3,
        point: Vec3,
        damage: f32,
    ) -> bool {
        if target == self.self_entity {
            return false;
        }

        let before = self.effects.len();
        if capabilities.contains(Capabilities::DESTRUCTIBLE) {
            self.impact(target, ImpactCommand::ApplyForce { force, point });
        }
        if capabilities.contains(Capabilities::RIGID_BODY) {
            self.impact(target, ImpactCommand::ApplyImpulse { impulse: force });
        }
        if capabilities.contains(Capabilities::MORTAL) {
            self.impact(target, ImpactCommand::Kill { force });
        }
        if capabilities.contains(Capabilities::HEALTH) && damage > 0.0 {
            self.impact(target, ImpactCommand::ApplyDamage { amount: damage });
        }
        self.effects.len() > before
    }
}

/// Область удара (overlap sphere вокруг точки).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeArea {
    pub center: Vec3,
    pub radius: f32,
    pub force: f32,
    pub health_damage_ratio: f32,
    /// Подмена y направления (jump slam подбрасывает: 0.5)
    pub lift: Option<f32>,
    /// Обнулить y направления (chomp)
    pub flatten: bool,
}

/// Overlap + dispatch по всем целям кроме себя. Возвращает число задетых целей.
pub fn strike_area(ctx: &mut AbilityContext<'_>, area: StrikeArea) -> usize {
    let hits = ctx.world.overlap_sphere(area.center, area.radius);
    let damage = area.force * area.health_damage_ratio;

    let mut struck = 0;
    for hit in hits {
        let mut direction = (hit.position - area.center).normalize_or_zero();
        if area.flatten {
            direction.y = 0.0;
        }
        if let Some(lift) = area.lift {
            direction.y = lift;
        }

        if ctx.dispatch(hit.entity, hit.capabilities, direction * area.force, hit.closest_point, damage) {
            struck += 1;
        }
    }
    struck
}
