//! AI systems (boss decision loop)

pub mod boss;
pub mod targeting;

// Re-export all systems
pub use boss::*;
pub use targeting::*;
