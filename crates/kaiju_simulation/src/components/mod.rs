//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: агент (player/boss), Health, маркеры
//! - movement: PhysicsBody, границы арены (Arena)
//! - world: разрушаемые здания, толпа NPC

pub mod actor;
pub mod movement;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use world::*;
