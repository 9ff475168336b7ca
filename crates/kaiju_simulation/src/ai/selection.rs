//! Ability selection: range buckets, anti-repeat, forced roll через здания

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::abilities::{AbilityKind, AbilityLoadout};
use crate::ai::BossConfig;
use crate::execution::AbilityCooldowns;

/// Дистанционный класс цели
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBucket {
    Close,
    Mid,
    Far,
}

impl RangeBucket {
    /// None: дальше far_range
    pub fn classify(distance: f32, config: &BossConfig) -> Option<Self> {
        if distance <= config.close_range {
            Some(RangeBucket::Close)
        } else if distance <= config.mid_range {
            Some(RangeBucket::Mid)
        } else if distance <= config.far_range {
            Some(RangeBucket::Far)
        } else {
            None
        }
    }

    pub fn abilities(self) -> &'static [AbilityKind] {
        match self {
            RangeBucket::Close => &[AbilityKind::DashSlash, AbilityKind::Chomp, AbilityKind::Roll],
            RangeBucket::Mid => &[AbilityKind::DashSlash, AbilityKind::JumpSlam, AbilityKind::BeamSweep],
            RangeBucket::Far => &[AbilityKind::JumpSlam, AbilityKind::BeamSweep],
        }
    }
}

/// Стоящие здания вокруг босса
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuildingScan {
    pub count: usize,
    pub centroid: Vec3,
}

impl BuildingScan {
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        let mut count = 0;
        let mut sum = Vec3::ZERO;
        for position in positions {
            count += 1;
            sum += position;
        }
        Self {
            count,
            centroid: if count > 0 { sum / count as f32 } else { Vec3::ZERO },
        }
    }
}

/// Что выбрали
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub kind: AbilityKind,
    /// Куда целиться (зафиксируется при старте ability)
    pub aim: Vec3,
    /// Forced roll через здания
    pub forced: bool,
}

/// Всё, что нужно для выбора на одном decision tick
pub struct SelectionContext<'a> {
    pub distance: f32,
    pub target: Vec3,
    pub now: f32,
    pub buildings: BuildingScan,
    pub last_ability: Option<AbilityKind>,
    pub loadout: &'a AbilityLoadout,
    pub cooldowns: &'a AbilityCooldowns,
    pub config: &'a BossConfig,
}

impl SelectionContext<'_> {
    fn ready(&self, kind: AbilityKind) -> bool {
        self.loadout
            .cooldown(kind)
            .is_some_and(|cooldown| self.cooldowns.is_ready(kind, cooldown, self.now))
    }

    /// Abilities bucket'а, которые есть в loadout и готовы
    pub fn eligible(&self, bucket: RangeBucket) -> Vec<AbilityKind> {
        bucket
            .abilities()
            .iter()
            .copied()
            .filter(|kind| self.ready(*kind))
            .collect()
    }
}

/// Равномерный выбор с anti-repeat.
///
/// Last-used исключается, если есть альтернатива; иначе повтор допустим.
pub fn pick_with_anti_repeat<R: Rng + ?Sized>(
    eligible: &[AbilityKind],
    last: Option<AbilityKind>,
    rng: &mut R,
) -> Option<AbilityKind> {
    let fresh: Vec<AbilityKind> = eligible
        .iter()
        .copied()
        .filter(|kind| Some(*kind) != last)
        .collect();

    if fresh.is_empty() {
        eligible.choose(rng).copied()
    } else {
        fresh.choose(rng).copied()
    }
}

/// Forced roll: достаточно зданий рядом + roll готов + бросок удачен
pub fn forced_roll<R: Rng + ?Sized>(ctx: &SelectionContext<'_>, rng: &mut R) -> bool {
    if ctx.buildings.count == 0 || ctx.buildings.count < ctx.config.building_threshold {
        return false;
    }
    if !ctx.ready(AbilityKind::Roll) {
        return false;
    }
    rng.gen::<f32>() < ctx.config.forced_roll_chance
}

/// Выбор ability на decision tick (None: нечего запускать)
pub fn select_ability<R: Rng + ?Sized>(ctx: &SelectionContext<'_>, rng: &mut R) -> Option<Selection> {
    if forced_roll(ctx, rng) {
        return Some(Selection {
            kind: AbilityKind::Roll,
            aim: ctx.buildings.centroid,
            forced: true,
        });
    }

    let bucket = RangeBucket::classify(ctx.distance, ctx.config)?;
    let eligible = ctx.eligible(bucket);
    let kind = pick_with_anti_repeat(&eligible, ctx.last_ability, rng)?;

    Some(Selection {
        kind,
        aim: ctx.target,
        forced: false,
    })
}
