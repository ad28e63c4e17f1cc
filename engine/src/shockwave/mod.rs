//! Particle-based shockwave simulation
//!
//! A shockwave is a batch of ballistic particles spawned on a sphere and
//! advanced once per fixed timestep against the collider world. Particles
//! bounce off static colliders, push on rigid bodies in proportion to the
//! shock pressure of the medium, and die when they fall below the speed of
//! sound.

pub mod medium;
pub mod particle;
pub mod simulator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use medium::ShockwaveMedium;
pub use particle::ShockwaveParticle;
pub use simulator::ShockwaveSimulator;

/// Fatal shockwave configuration errors
///
/// Recoverable anomalies (negative radius, out-of-range absorption) are
/// corrected with a warning instead; see [`ShockwaveSimulator::setup`].
#[derive(Debug, Error)]
pub enum ShockwaveError {
    #[error("initial particle count must be positive, got {0}")]
    InvalidParticleCount(i32),
    #[error("max count multiplier must be at least 1, got {0}")]
    InvalidMaxCountMultiplier(f32),
    #[error("no wave medium configured")]
    MissingMedium,
    #[error("medium {field} must be positive, got {value}")]
    InvalidMedium { field: &'static str, value: f32 },
    #[error("simulator has not been set up")]
    NotSetUp,
}

/// Shockwave simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShockwaveConfig {
    /// Number of particles to spawn, before scaling by `accuracy`. The
    /// realized count differs slightly due to sphere-distribution rounding.
    pub default_initial_count: i32,
    /// Pool capacity as a multiple of the initial count
    pub max_count_multiplier: f32,
    /// Radius of the wave at spawn time, may be zero (m)
    pub initial_radius: f32,
    /// Constant particle acceleration, usually negative (m/s²)
    pub constant_acceleration: f32,
    /// Fraction of energy absorbed on a static-collider bounce, in [0, 1]
    pub absorption_factor: f32,
    /// Lose energy on static-collider bounces
    pub enable_absorption: bool,
    /// Bounce off dynamic colliders as well as static ones
    pub dynamic_bounces: bool,
    /// Spawn a weakened child particle through the wall on each bounce
    pub transmittance: bool,
    /// Initial wave speed (m/s)
    pub initial_speed: f32,
    /// Scales the particle count; higher is more accurate and more costly
    pub accuracy: f32,
    /// Visualisation hint for an external consumer. Declared for
    /// configuration compatibility; trail segments are tracked either way.
    pub visualisation: bool,
    /// Log per-tick bounce/interaction counters
    pub debug_mode: bool,
    /// The wave medium; setup fails without one
    pub medium: Option<ShockwaveMedium>,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            default_initial_count: 10000,
            max_count_multiplier: 10.0,
            initial_radius: 0.0,
            constant_acceleration: -5.0,
            absorption_factor: 0.2,
            enable_absorption: true,
            dynamic_bounces: false,
            transmittance: false,
            initial_speed: 500.0,
            accuracy: 1.0,
            visualisation: false,
            debug_mode: false,
            medium: None,
        }
    }
}
