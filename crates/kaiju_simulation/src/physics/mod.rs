//! Physics module
//!
//! - query: WorldQuery trait + CollisionWorld (снимок мира на тик)
//! - movement: интеграция PhysicsBody → Transform с клампом арены
//!
//! Rigid-body солвер: внешний (bevy_rapier3d), геометрия запросов: его Collider.
//! Здесь только снимок мира на тик
//! и kinematic движение агентов.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod movement;
pub mod query;

pub use movement::{integrate_bodies, integrate_step};
pub use query::{
    capabilities_of, rebuild_collision_world, Capabilities, CollisionEntry, CollisionWorld,
    OverlapHit, RayHit, WorldQuery,
};

/// Physics Plugin
///
/// rebuild_collision_world: в начале тика (Perception),
/// integrate_bodies: в конце (Movement).
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionWorld>()
            .add_systems(
                FixedUpdate,
                rebuild_collision_world.in_set(SimulationSet::Perception),
            )
            .add_systems(FixedUpdate, integrate_bodies.in_set(SimulationSet::Movement));
    }
}
