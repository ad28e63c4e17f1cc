//! Impulse-based rigid-body physics subsystem
//!
//! The subsystem is driven externally: a host calls [`physics_step`] once
//! per fixed timestep. Within a tick the order is fixed — collider bounds
//! refresh, then overlap queries and collision resolution, then rigid-body
//! integration. Skipping ticks (a paused host) is a no-op, not an error.

pub mod accumulator;
pub mod collision;
pub mod components;
pub mod system;
pub mod world;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use accumulator::TickAccumulator;
pub use collision::{Aabb, Collision, ContactPoint};
pub use components::{Collider, CollisionShape, CombineMode, ForceMode, PhysicsMaterial, Rigidbody};
pub use system::{physics_step, CollisionEvent, ContactMemory, TickEvents, TriggerEvent};
pub use world::{PhysicsWorld, RaycastHit};

/// Overrides the global `queries_hit_triggers` setting for a single query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryTriggerInteraction {
    /// Use the global `PhysicsConfig::queries_hit_triggers` setting
    #[default]
    UseGlobal,
    /// Never report trigger hits
    Ignore,
    /// Always report trigger hits
    Collide,
}

/// How repeated contact resolution is suppressed across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContactTracking {
    /// A single sticky per-collider flag: a collider that resolved any
    /// contact last tick will not resolve again this tick, even against a
    /// different collider. This is the historical behavior.
    #[default]
    Coarse,
    /// Track last-tick contacts per unordered collider pair, so contact
    /// with a second collider is still resolved.
    PerPair,
}

/// Global physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity applied along the world Y axis to all rigid bodies
    pub gravity: f32,
    /// Whether overlap/raycast queries hit trigger colliders by default
    pub queries_hit_triggers: bool,
    /// Fixed timestep for the tick accumulator
    pub fixed_timestep: f32,
    /// Colliding pairs with a relative velocity below this will not bounce.
    /// Declared for configuration compatibility; resolution does not consult
    /// it yet.
    pub bounce_threshold: f32,
    /// Sleep threshold for rigid bodies. Declared for configuration
    /// compatibility; each body carries its own `sleep_threshold` and
    /// integration reads that.
    pub sleep_threshold: f32,
    /// Contact suppression mode
    pub contact_tracking: ContactTracking,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            queries_hit_triggers: true,
            fixed_timestep: 1.0 / 60.0,
            bounce_threshold: 2.0,
            sleep_threshold: 0.0,
            contact_tracking: ContactTracking::Coarse,
        }
    }
}
