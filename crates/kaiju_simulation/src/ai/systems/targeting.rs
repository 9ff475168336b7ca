//! Target acquisition: ближайший живой игрок

use bevy::prelude::*;

use crate::ai::{BossBrain, BossConfig, TargetCache};
use crate::combat::LifeState;
use crate::components::Player;

/// Ближайшая цель (ничья по дистанции → меньший Entity, для детерминизма)
pub fn nearest_target(origin: Vec3, candidates: impl IntoIterator<Item = (Entity, Vec3)>) -> Option<Entity> {
    candidates
        .into_iter()
        .map(|(entity, position)| (entity, origin.distance_squared(position)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(entity, _)| entity)
}

/// Система: перевыбор цели
///
/// Когда: цели нет, цель исчезла / умерла, или прошёл target_refresh_interval.
pub fn acquire_targets(
    mut bosses: Query<(Entity, &mut TargetCache, &Transform, &BossConfig, &LifeState), With<BossBrain>>,
    players: Query<(Entity, &Transform, &LifeState), With<Player>>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, mut cache, transform, config, life) in bosses.iter_mut() {
        if !life.is_alive() {
            continue;
        }

        let target_lost = cache
            .target
            .is_some_and(|target| !players.get(target).is_ok_and(|(_, _, life)| life.is_alive()));

        if !target_lost && !cache.needs_refresh(now, config.target_refresh_interval) {
            continue;
        }

        let candidates = players
            .iter()
            .filter(|(_, _, life)| life.is_alive())
            .map(|(player, player_transform, _)| (player, player_transform.translation));
        let next = nearest_target(transform.translation, candidates);

        if next != cache.target {
            crate::logger::log(&format!("🎯 Boss {:?} target: {:?} → {:?}", entity, cache.target, next));
        }
        cache.target = next;
        cache.refreshed_at = now;
    }
}
