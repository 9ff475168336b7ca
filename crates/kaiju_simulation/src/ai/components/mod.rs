//! AI components

pub mod brain;
pub mod config;


// Re-export all components
pub use brain::*;
pub use config::*;
