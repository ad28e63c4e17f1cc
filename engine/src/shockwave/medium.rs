//! Wave medium properties and the shock-pressure relation

use crate::shockwave::ShockwaveError;
use serde::{Deserialize, Serialize};

/// Properties of the medium a shockwave travels through
///
/// Defaults describe air at Earth sea level. All three values must be
/// strictly positive; deserialized mediums are re-validated at simulator
/// setup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShockwaveMedium {
    /// Ambient pressure of the undisturbed medium (Pa)
    pub atmospheric_pressure: f32,
    /// Heat capacity ratio of the medium
    pub heat_capacity: f32,
    /// Speed of sound in the medium (m/s)
    pub speed_of_sound: f32,
}

impl Default for ShockwaveMedium {
    fn default() -> Self {
        Self {
            atmospheric_pressure: 100_000.0,
            heat_capacity: 1.4,
            speed_of_sound: 343.0,
        }
    }
}

impl ShockwaveMedium {
    /// Create a validated medium
    pub fn new(
        atmospheric_pressure: f32,
        heat_capacity: f32,
        speed_of_sound: f32,
    ) -> Result<Self, ShockwaveError> {
        let medium = Self {
            atmospheric_pressure,
            heat_capacity,
            speed_of_sound,
        };
        medium.validate()?;
        Ok(medium)
    }

    /// Check that every property is strictly positive
    pub fn validate(&self) -> Result<(), ShockwaveError> {
        let fields = [
            ("atmospheric_pressure", self.atmospheric_pressure),
            ("heat_capacity", self.heat_capacity),
            ("speed_of_sound", self.speed_of_sound),
        ];
        for (field, value) in fields {
            if value <= 0.0 {
                return Err(ShockwaveError::InvalidMedium { field, value });
            }
        }
        Ok(())
    }

    /// Shock pressure of a wave front travelling at `speed` through this
    /// medium, from the normal-shock relation over the Mach number
    pub fn shock_pressure(&self, speed: f32) -> f32 {
        let mach = speed / self.speed_of_sound;
        let gamma = self.heat_capacity;
        ((2.0 * gamma * mach * mach - (gamma - 1.0)) / (gamma + 1.0)) * self.atmospheric_pressure
    }
}
