//! Kinematic state of a single shockwave particle
//!
//! A particle represents one sector of the expanding wave front. It has no
//! effect after being killed; its pool slot is reused by later spawns.

use glam::Vec3;
use std::f32::consts::PI;

/// One particle of the wave front
#[derive(Debug, Clone, Copy)]
pub struct ShockwaveParticle {
    /// Position in world space
    pub position: Vec3,
    /// Position at the end of the previous tick
    pub prev_position: Vec3,
    /// Normalized direction of travel
    pub direction: Vec3,
    /// Current speed (m/s)
    pub speed: f32,
    /// Constant acceleration, normally negative or zero (m/s²)
    pub constant_acceleration: f32,
    /// Speed at spawn time
    pub init_speed: f32,
    /// Fixed time at spawn
    pub init_time: f32,
    /// Number of particles spawned in the same batch
    batch_count: u32,
    alive: bool,
}

impl ShockwaveParticle {
    /// Spawn a particle from a velocity vector at the given fixed time
    pub fn from_velocity(
        position: Vec3,
        velocity: Vec3,
        constant_acceleration: f32,
        batch_count: u32,
        now: f32,
    ) -> Self {
        let speed = velocity.length();
        let direction = if speed > f32::EPSILON {
            velocity / speed
        } else {
            Vec3::ZERO
        };
        Self {
            position,
            prev_position: position,
            direction,
            speed,
            constant_acceleration,
            init_speed: speed,
            init_time: now,
            batch_count,
            alive: true,
        }
    }

    /// Radius of the wave sector this particle represents: the distance
    /// travelled since spawn under constant acceleration
    pub fn radius(&self, now: f32) -> f32 {
        let time = now - self.init_time;
        self.init_speed * time + self.constant_acceleration * time * time / 2.0
    }

    /// Surface area of the wave sector (m²): the full sphere at the current
    /// radius divided evenly over the spawn batch
    pub fn surface_area(&self, now: f32) -> f32 {
        let radius = self.radius(now);
        4.0 * PI * radius * radius / self.batch_count as f32
    }

    /// Current velocity vector
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }

    /// Move the particle, remembering the previous position for trails
    pub fn set_position(&mut self, position: Vec3) {
        self.prev_position = self.position;
        self.position = position;
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_under_constant_acceleration() {
        let p = ShockwaveParticle::from_velocity(Vec3::ZERO, Vec3::X * 500.0, -5.0, 100, 10.0);
        // r(t) = v0*t + a*t^2/2, two seconds after spawn
        let expected = 500.0 * 2.0 + (-5.0) * 4.0 / 2.0;
        assert!((p.radius(12.0) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_surface_area_splits_sphere_over_batch() {
        let p = ShockwaveParticle::from_velocity(Vec3::ZERO, Vec3::X * 100.0, 0.0, 4, 0.0);
        // Radius 100 after one second; full sphere area over 4 particles
        let expected = 4.0 * PI * 100.0 * 100.0 / 4.0;
        assert!((p.surface_area(1.0) - expected).abs() / expected < 1e-5);
    }

    #[test]
    fn test_set_position_tracks_previous() {
        let mut p = ShockwaveParticle::from_velocity(Vec3::ZERO, Vec3::X, 0.0, 1, 0.0);
        p.set_position(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.prev_position, Vec3::ZERO);
        p.set_position(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(p.prev_position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p.position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_killed_particle_reports_dead() {
        let mut p = ShockwaveParticle::from_velocity(Vec3::ZERO, Vec3::X, 0.0, 1, 0.0);
        assert!(p.is_alive());
        p.kill();
        assert!(!p.is_alive());
    }
}
