//! Entity system functionality
//!
//! Colliders and rigid bodies are plain components on entities; the
//! simulation core owns no scene graph of its own.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::{Name, Transform};
pub use world::World;

// Re-export hecs types that users will need
pub use hecs::Entity;
