//! World queries для abilities: overlap sphere + raycast
//!
//! Abilities видят мир только через trait `WorldQuery`. В игре это
//! `CollisionWorld` (снимок collider'ов, пересобирается каждый тик),
//! в тестах тот же `CollisionWorld`, собранный руками.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody, Sensor};
use bitflags::bitflags;

use crate::combat::Dead;
use crate::components::{CrowdMember, Destructible, Health};

bitflags! {
    /// Что можно сделать с целью удара (проверяется в фиксированном порядке).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// ApplyForce: разрушаемое здание
        const DESTRUCTIBLE = 1 << 0;
        /// ApplyImpulse: Dynamic rigid body (kinematic агентами двигает симуляция)
        const RIGID_BODY = 1 << 1;
        /// Kill(force): NPC толпы
        const MORTAL = 1 << 2;
        /// ApplyDamage: есть Health
        const HEALTH = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub entity: Entity,
    /// Центр collider (аналог hit.transform.position)
    pub position: Vec3,
    /// Ближайшая к центру запроса точка collider
    pub closest_point: Vec3,
    pub is_trigger: bool,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
    pub is_trigger: bool,
    pub capabilities: Capabilities,
}

/// Интерфейс физического мира для abilities.
pub trait WorldQuery {
    /// Все collider'ы (включая sensor), пересекающие сферу.
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<OverlapHit>;

    /// Первый hit луча (включая sensor, см. `RayHit::is_trigger`).
    ///
    /// Collider'ы, внутри которых находится origin, игнорируются.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Entity>,
    ) -> Option<RayHit>;
}

/// Один collider в снимке мира.
///
/// Геометрию запросов считает сам rapier `Collider` (parry shape),
/// поэтому видна любая форма: ball, cuboid, capsule, cylinder, compound.
#[derive(Debug, Clone)]
pub struct CollisionEntry {
    pub entity: Entity,
    pub collider: Collider,
    pub translation: Vec3,
    pub rotation: Quat,
    pub is_trigger: bool,
    pub capabilities: Capabilities,
}

impl CollisionEntry {
    pub fn new(entity: Entity, collider: Collider, translation: Vec3) -> Self {
        Self {
            entity,
            collider,
            translation,
            rotation: Quat::IDENTITY,
            is_trigger: false,
            capabilities: Capabilities::empty(),
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Ближайшая к `point` точка collider (сама точка, если она внутри)
    fn closest_point(&self, point: Vec3) -> Vec3 {
        self.collider
            .project_point(self.translation, self.rotation, point, true)
            .point
    }

    fn contains(&self, point: Vec3) -> bool {
        self.collider.contains_point(self.translation, self.rotation, point)
    }

    /// Расстояние до поверхности вдоль нормализованного `direction`
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        self.collider
            .cast_ray(self.translation, self.rotation, origin, direction, max_distance, true)
    }
}

/// Снимок collider'ов на текущий тик.
///
/// Порядок entries отсортирован по Entity → overlap результаты детерминированы.
#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionWorld {
    entries: Vec<CollisionEntry>,
}

impl CollisionWorld {
    pub fn new(mut entries: Vec<CollisionEntry>) -> Self {
        entries.sort_by_key(|entry| entry.entity);
        Self { entries }
    }

    pub fn entries(&self) -> &[CollisionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WorldQuery for CollisionWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<OverlapHit> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let closest = entry.closest_point(center);
                if closest.distance_squared(center) > radius * radius {
                    return None;
                }

                Some(OverlapHit {
                    entity: entry.entity,
                    position: entry.translation,
                    closest_point: closest,
                    is_trigger: entry.is_trigger,
                    capabilities: entry.capabilities,
                })
            })
            .collect()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Entity>,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;

        self.entries
            .iter()
            .filter(|entry| Some(entry.entity) != exclude)
            // Луч изнутри collider не считается
            .filter(|entry| !entry.contains(origin))
            .filter_map(|entry| {
                let distance = entry.cast_ray(origin, direction, max_distance)?;

                Some(RayHit {
                    entity: entry.entity,
                    point: origin + direction * distance,
                    distance,
                    is_trigger: entry.is_trigger,
                    capabilities: entry.capabilities,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Capabilities из набора компонентов entity
pub fn capabilities_of(
    destructible: bool,
    rigid_body: Option<&RigidBody>,
    crowd_member: bool,
    dead: bool,
    health: bool,
) -> Capabilities {
    let mut capabilities = Capabilities::empty();
    if destructible {
        capabilities |= Capabilities::DESTRUCTIBLE;
    }
    if rigid_body.is_some_and(|body| matches!(body, RigidBody::Dynamic)) {
        capabilities |= Capabilities::RIGID_BODY;
    }
    if crowd_member && !dead {
        capabilities |= Capabilities::MORTAL;
    }
    if health {
        capabilities |= Capabilities::HEALTH;
    }
    capabilities
}

/// Система: пересобирает CollisionWorld из Transform + rapier Collider
///
/// Работает первой в тике: abilities и AI видят позиции после прошлой интеграции.
pub fn rebuild_collision_world(
    mut collision_world: ResMut<CollisionWorld>,
    colliders: Query<(
        Entity,
        &Transform,
        &Collider,
        Has<Sensor>,
        Option<&RigidBody>,
        Has<Destructible>,
        Has<CrowdMember>,
        Has<Dead>,
        Has<Health>,
    )>,
) {
    let entries = colliders
        .iter()
        .map(
            |(entity, transform, collider, sensor, rigid_body, destructible, crowd, dead, health)| {
                let mut entry = CollisionEntry::new(entity, collider.clone(), transform.translation)
                    .with_rotation(transform.rotation)
                    .with_capabilities(capabilities_of(destructible, rigid_body, crowd, dead, health));
                entry.is_trigger = sensor;
                entry
            },
        )
        .collect();

    *collision_world = CollisionWorld::new(entries);
}
