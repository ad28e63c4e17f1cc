//! Shockwave simulator: particle pool, spawning and per-tick advance
//!
//! The simulator owns a bounded particle pool. `setup` validates the
//! configuration, `spawn` distributes a batch of particles on a sphere, and
//! `update` advances every live particle by one fixed timestep against the
//! collider world, applying impulses to any rigid bodies the wave front
//! passes through. Visualisation stays external; `trail_segments` exposes
//! the data and the simulator runs fine with no consumer.

use crate::core::entity::World;
use crate::physics::components::{ForceMode, Rigidbody};
use crate::physics::world::PhysicsWorld;
use crate::physics::QueryTriggerInteraction;
use crate::shockwave::{ShockwaveConfig, ShockwaveError, ShockwaveMedium, ShockwaveParticle};
use glam::Vec3;
use hecs::Entity;
use std::f32::consts::PI;
use tracing::{debug, error, warn};

/// Particle shockwave simulator
///
/// Lifecycle: construct with a config, `setup` once, then `spawn` waves and
/// `update` once per fixed timestep. `reset` returns to the unconfigured
/// state.
pub struct ShockwaveSimulator {
    config: ShockwaveConfig,
    /// Medium resolved and validated at setup
    medium: ShockwaveMedium,
    /// Desired spawn count after scaling by accuracy
    initial_count: i32,
    /// Pool capacity; spawns beyond this are dropped
    capacity: usize,
    /// Highest shock pressure seen so far, for trail color interpolation
    high_shock_pressure: f32,
    /// Particle pool. Slots past the high-water mark are unused; dead slots
    /// are listed in `free` and overwritten by later spawns.
    slots: Vec<ShockwaveParticle>,
    /// Indices of dead slots available for reuse, most recent first
    free: Vec<usize>,
    alive_count: usize,
    set_up: bool,
    pool_full_reported: bool,
}

impl ShockwaveSimulator {
    pub fn new(config: ShockwaveConfig) -> Self {
        Self {
            config,
            medium: ShockwaveMedium::default(),
            initial_count: 0,
            capacity: 0,
            high_shock_pressure: -1.0,
            slots: Vec::new(),
            free: Vec::new(),
            alive_count: 0,
            set_up: false,
            pool_full_reported: false,
        }
    }

    /// Validate the configuration and allocate the particle pool
    ///
    /// Fatal problems (non-positive particle count, multiplier below one,
    /// missing or invalid medium) are returned as errors. Recoverable ones
    /// are corrected in place with a warning: a negative initial radius is
    /// replaced by its absolute value and an absorption factor outside
    /// [0, 1] is clamped. A positive acceleration and a sub-sonic initial
    /// speed only warn.
    pub fn setup(&mut self) -> Result<(), ShockwaveError> {
        self.set_up = false;

        let medium = self.config.medium.ok_or(ShockwaveError::MissingMedium)?;
        medium.validate()?;

        if self.config.initial_speed < medium.speed_of_sound {
            warn!(
                initial_speed = self.config.initial_speed,
                speed_of_sound = medium.speed_of_sound,
                "Initial speed is below the speed of sound; the wave will have no effect"
            );
        }

        let initial_count =
            (self.config.default_initial_count as f32 * self.config.accuracy).round() as i32;
        if initial_count <= 0 {
            return Err(ShockwaveError::InvalidParticleCount(initial_count));
        }
        if self.config.max_count_multiplier < 1.0 {
            return Err(ShockwaveError::InvalidMaxCountMultiplier(
                self.config.max_count_multiplier,
            ));
        }

        if self.config.initial_radius < 0.0 {
            warn!(
                initial_radius = self.config.initial_radius,
                "Initial radius should not be negative; using the absolute value"
            );
            self.config.initial_radius = self.config.initial_radius.abs();
        }
        if self.config.constant_acceleration > 0.0 {
            warn!(
                constant_acceleration = self.config.constant_acceleration,
                "Constant acceleration should usually be negative"
            );
        }
        if !(0.0..=1.0).contains(&self.config.absorption_factor) {
            warn!(
                absorption_factor = self.config.absorption_factor,
                "Absorption factor should be between 0 and 1; clamping"
            );
            self.config.absorption_factor = self.config.absorption_factor.clamp(0.0, 1.0);
        }

        self.medium = medium;
        self.initial_count = initial_count;
        self.capacity = (initial_count as f32 * self.config.max_count_multiplier).round() as usize;
        self.high_shock_pressure = medium.shock_pressure(self.config.initial_speed);
        self.slots = Vec::with_capacity(self.capacity);
        self.free = Vec::new();
        self.alive_count = 0;
        self.pool_full_reported = false;
        self.set_up = true;

        debug!(
            initial_count = self.initial_count,
            capacity = self.capacity,
            "Shockwave simulator set up"
        );

        Ok(())
    }

    /// Return the simulator to its unconfigured state, dropping the pool
    pub fn reset(&mut self) {
        self.initial_count = 0;
        self.capacity = 0;
        self.high_shock_pressure = -1.0;
        self.slots = Vec::new();
        self.free = Vec::new();
        self.alive_count = 0;
        self.pool_full_reported = false;
        self.set_up = false;
    }

    /// Spawn a wave at the given origin, distributing particles evenly on a
    /// sphere of the configured initial radius
    ///
    /// Returns the realized particle count, which differs slightly from the
    /// configured count due to distribution rounding.
    pub fn spawn(
        &mut self,
        origin: Vec3,
        physics_world: &PhysicsWorld,
    ) -> Result<usize, ShockwaveError> {
        if !self.set_up {
            return Err(ShockwaveError::NotSetUp);
        }
        let now = physics_world.fixed_time() as f32;
        Ok(self.spawn_sphere(self.initial_count, self.config.initial_radius, origin, now))
    }

    /// Advance every live particle by one fixed timestep
    ///
    /// Per particle: cast along the travel segment; bounce off static
    /// colliders (reflect, absorb energy, optionally spawn a transmittance
    /// child through the wall); push on any rigid body the segment crosses;
    /// apply constant acceleration; die below the speed of sound. Does
    /// nothing before `setup`.
    pub fn update(&mut self, world: &mut World, physics_world: &mut PhysicsWorld, dt: f32) {
        if !self.set_up {
            return;
        }

        let now = physics_world.fixed_time() as f32;
        let mut bounce_count = 0u32;
        let mut interaction_count = 0u32;
        let mut forces: Vec<(Entity, Vec3, Vec3)> = Vec::new();

        // Re-read the length every iteration: transmittance children
        // appended during the pass are advanced within the same tick
        let mut i = 0;
        while i < self.slots.len() {
            let p = self.slots[i];
            if !p.is_alive() {
                i += 1;
                continue;
            }

            let distance = p.speed * dt;
            let shock_pressure = self.medium.shock_pressure(p.speed);
            if shock_pressure > self.high_shock_pressure {
                self.high_shock_pressure = shock_pressure;
            }

            let mut new_position = p.position;
            let mut new_direction = p.direction;
            let mut new_speed = p.speed;
            let mut killed = false;

            // Where the particle ends up if nothing is in the way
            let cast_point = p.position + p.direction * distance;

            // A "hit" is any collider crossing the travel segment; a
            // "bounce" is a hit the particle reflects off (static colliders
            // only, unless dynamic bounces are enabled); an "interaction"
            // is a hit on a rigid body, which receives a force.
            let hit = physics_world.linecast(
                world,
                p.position,
                cast_point,
                QueryTriggerInteraction::UseGlobal,
            );

            if let Some(interaction) = hit {
                let ray_hit = physics_world.raycast(
                    world,
                    p.position,
                    p.direction,
                    distance,
                    QueryTriggerInteraction::UseGlobal,
                );

                // A hit on a rigid body only counts as a bounce when dynamic
                // bounces are enabled, but its distance and point still feed
                // the interaction force below. Both stay zero only when the
                // ray missed entirely, in which case the force covers the
                // full step.
                let bounce =
                    ray_hit.filter(|b| self.config.dynamic_bounces || b.rigidbody.is_none());
                let bounce_distance = ray_hit.map_or(0.0, |b| b.distance);
                let bounce_point = ray_hit.map_or(Vec3::ZERO, |b| b.point);

                if let Some(b) = bounce {
                    if self.config.enable_absorption && self.config.absorption_factor >= 1.0 {
                        // Total absorption: the wall soaks up the particle
                        killed = true;
                    } else {
                        new_direction = p.direction.reflect(b.normal);
                        new_position = b.point + new_direction * (distance - b.distance);

                        if self.config.enable_absorption {
                            new_speed *= 1.0 - self.config.absorption_factor;
                        }

                        if self.config.transmittance {
                            // A weakened child continues through the wall
                            // from where the particle would have ended up
                            let child_speed = p.speed * 0.7 + p.constant_acceleration * dt;
                            self.spawn_particle(
                                cast_point,
                                p.position,
                                p.direction * child_speed,
                                self.config.constant_acceleration,
                                1,
                                now,
                            );
                        }
                    }
                    bounce_count += 1;
                } else {
                    new_position = cast_point;
                }

                if let Some(body) = interaction.rigidbody {
                    let mut magnitude = p.surface_area(now) * shock_pressure;
                    magnitude *= (distance - bounce_distance) / distance;
                    magnitude *= dt;
                    forces.push((body, p.direction * magnitude, bounce_point));
                    interaction_count += 1;
                }
            } else {
                new_position = cast_point;
            }

            new_speed += p.constant_acceleration * dt;

            // The wave front decays into ordinary sound below Mach 1
            if new_speed < self.medium.speed_of_sound {
                killed = true;
            }

            let slot = &mut self.slots[i];
            slot.set_position(new_position);
            slot.direction = new_direction;
            slot.speed = new_speed;
            if killed {
                self.kill_particle(i);
            }
            i += 1;
        }

        for (entity, force, point) in forces {
            if let Ok(rigidbody) = world.query_one_mut::<&mut Rigidbody>(entity) {
                rigidbody.add_force_at_position(force, point, ForceMode::Impulse, dt);
            }
        }

        if self.config.debug_mode && (bounce_count > 0 || interaction_count > 0) {
            debug!(
                fixed_time = physics_world.fixed_time(),
                bounces = bounce_count,
                interactions = interaction_count,
                "Shockwave tick"
            );
        }
    }

    /// Trail segments of all live particles for an external visualiser
    ///
    /// Each segment is `(prev_position, position, pressure_ratio)` where the
    /// ratio is the particle's shock pressure against the highest pressure
    /// seen so far.
    pub fn trail_segments(&self) -> Vec<(Vec3, Vec3, f32)> {
        self.slots
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| {
                (
                    p.prev_position,
                    p.position,
                    self.medium.shock_pressure(p.speed) / self.high_shock_pressure,
                )
            })
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Number of pool slots ever used
    pub fn high_water_mark(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_set_up(&self) -> bool {
        self.set_up
    }

    /// Highest shock pressure of any particle so far
    pub fn high_shock_pressure(&self) -> f32 {
        self.high_shock_pressure
    }

    /// Spawn `desired` particles evenly over a sphere surface using the
    /// Deserno equal-area distribution. Every particle carries the realized
    /// batch count so its surface-area share stays consistent.
    fn spawn_sphere(&mut self, desired: i32, radius: f32, center: Vec3, now: f32) -> usize {
        let a = 4.0 * PI / desired as f32;
        let d = a.sqrt();
        let m_theta = (PI / d).round() as i32;
        let d_theta = PI / m_theta as f32;
        let d_phi = a / d_theta;

        // First pass: realized batch count
        let mut count: u32 = 0;
        for m in 0..m_theta {
            let theta = PI * (m as f32 + 0.5) / m_theta as f32;
            count += (2.0 * PI * theta.sin() / d_phi).round() as u32;
        }

        for m in 0..m_theta {
            let theta = PI * (m as f32 + 0.5) / m_theta as f32;
            let m_phi = (2.0 * PI * theta.sin() / d_phi).round() as i32;

            for n in 0..m_phi {
                let phi = 2.0 * PI * n as f32 / m_phi as f32;

                let direction = Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                )
                .normalize();
                let position = center + direction * radius;
                let velocity = direction * self.config.initial_speed;

                self.spawn_particle(
                    position,
                    position,
                    velocity,
                    self.config.constant_acceleration,
                    count,
                    now,
                );
            }
        }

        count as usize
    }

    /// Place a particle in the pool: reuse the most recently freed slot,
    /// else grow up to capacity, else drop the spawn with a warning
    fn spawn_particle(
        &mut self,
        position: Vec3,
        prev_position: Vec3,
        velocity: Vec3,
        acceleration: f32,
        batch_count: u32,
        now: f32,
    ) {
        let mut particle =
            ShockwaveParticle::from_velocity(position, velocity, acceleration, batch_count, now);
        particle.prev_position = prev_position;

        if let Some(index) = self.free.pop() {
            self.slots[index] = particle;
        } else if self.slots.len() < self.capacity {
            self.slots.push(particle);
            if self.slots.len() == self.capacity && !self.pool_full_reported {
                error!(
                    capacity = self.capacity,
                    "Particle pool is full; new particles spawn only as others die"
                );
                self.pool_full_reported = true;
            }
        } else {
            warn!("Cannot spawn particle; the pool is full");
            return;
        }

        self.alive_count += 1;
    }

    /// Kill the particle in the given slot and free the slot for reuse.
    /// Idempotent: killing a dead slot is a no-op.
    fn kill_particle(&mut self, index: usize) {
        if !self.slots[index].is_alive() {
            return;
        }
        self.slots[index].kill();
        self.free.push(index);
        self.alive_count -= 1;
    }
}
