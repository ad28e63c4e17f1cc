//! Simulation configuration loading

use crate::physics::PhysicsConfig;
use crate::shockwave::ShockwaveConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors arising while loading or saving a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub shockwave: ShockwaveConfig,
}

impl SimulationConfig {
    /// Load a configuration from a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)?;
        info!(path = %path.as_ref().display(), "Loaded simulation config");
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "Saved simulation config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shockwave::ShockwaveMedium;

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation.json");

        let mut config = SimulationConfig::default();
        config.physics.gravity = -3.7;
        config.shockwave.initial_speed = 750.0;
        config.shockwave.medium = Some(ShockwaveMedium::default());

        config.save_to_file(&path).unwrap();
        let loaded = SimulationConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded.physics.gravity, -3.7);
        assert_eq!(loaded.shockwave.initial_speed, 750.0);
        assert!(loaded.shockwave.medium.is_some());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{ "physics": { "gravity": -1.62 } }"#).unwrap();

        let loaded = SimulationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.physics.gravity, -1.62);
        assert_eq!(loaded.shockwave.default_initial_count, 10000);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SimulationConfig::load_from_file(&path),
            Err(ConfigError::Json(_))
        ));
    }
}
