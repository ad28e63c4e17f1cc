//! Fixed-timestep rigid-body physics with a particle shockwave simulator
//!
//! This crate provides a minimal impulse-based physics core (colliders,
//! rigid bodies, overlap/raycast queries) and a companion shockwave
//! simulator that advances ballistic particles against the same collider
//! registry and pushes forces back onto rigid bodies.

pub mod config;
pub mod core;
pub mod physics;
pub mod shockwave;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{Entity, Transform, World};

    // Math types
    pub use glam::{Quat, Vec3};

    // Physics types
    pub use crate::physics::{
        physics_step, Aabb, Collider, CollisionShape, ContactMemory, ContactTracking, ForceMode,
        PhysicsConfig, PhysicsMaterial, PhysicsWorld, QueryTriggerInteraction, Rigidbody,
        TickAccumulator, TickEvents,
    };

    // Shockwave types
    pub use crate::shockwave::{
        ShockwaveConfig, ShockwaveError, ShockwaveMedium, ShockwaveSimulator,
    };

    // Config types
    pub use crate::config::{ConfigError, SimulationConfig};
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
