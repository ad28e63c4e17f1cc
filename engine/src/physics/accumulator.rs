//! Fixed-timestep accumulator for driving the simulation tick
//!
//! The host feeds in frame delta times and steps the simulation once per
//! whole fixed timestep accumulated. A paused host simply stops feeding
//! time; the accumulator holds its remainder.

use tracing::warn;

/// Accumulator translating variable frame time into fixed simulation steps
#[derive(Debug)]
pub struct TickAccumulator {
    /// Accumulated time since the last simulation step
    accumulator: f32,
    /// Fixed timestep for simulation updates
    pub fixed_timestep: f32,
}

impl TickAccumulator {
    /// Create a new accumulator with the given fixed timestep
    pub fn new(fixed_timestep: f32) -> Self {
        Self {
            accumulator: 0.0,
            fixed_timestep,
        }
    }

    /// Add delta time to the accumulator
    /// Returns the number of simulation steps to perform
    pub fn accumulate(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time;

        // Safety check: prevent spiral of death
        if self.accumulator > self.fixed_timestep * 8.0 {
            warn!(
                "Tick accumulator too large: {} seconds. Clamping to prevent spiral of death.",
                self.accumulator
            );
            self.accumulator = self.fixed_timestep * 8.0;
        }

        let steps = (self.accumulator / self.fixed_timestep) as u32;
        self.accumulator -= steps as f32 * self.fixed_timestep;

        steps
    }

    /// Get the interpolation alpha value for rendering
    /// Alpha is in range [0, 1] representing how far between steps we are
    pub fn interpolation_alpha(&self) -> f32 {
        self.accumulator / self.fixed_timestep
    }

    /// Reset the accumulator to zero
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Get the current accumulated time
    pub fn accumulated_time(&self) -> f32 {
        self.accumulator
    }
}

impl Default for TickAccumulator {
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}
