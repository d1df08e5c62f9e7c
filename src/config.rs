//! Immutable simulation configuration.
//!
//! Every scenario parameter enters through this record: components never
//! read ambient values. The default reproduces the eight-magnet teaching
//! sequence the crate was built for.

use crate::error::ConfigError;
use crate::magnetic::array::MagnetArrayConfig;
use crate::magnetic::grid::GridRegion;
use crate::winding::WindingExcitation;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for one animation scenario.
#[derive(Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Magnet array layout parameters.
    pub array: MagnetArrayConfig,
    /// Sampling region handed to the renderer as a stream-plot grid.
    pub grid: GridRegion,
    /// Current carried by the single wire of the conductor-force pass.
    pub wire_current: f64,
    /// x velocity of the probe conductor in the voltage pass.
    pub conductor_velocity: f64,
    /// Length of the probe conductor.
    pub conductor_length: f64,
    /// Height of the conductor path above the array.
    pub probe_height: f64,
    /// Number of frames in one animation cycle.
    pub frame_count: u64,
    /// Three-phase excitation and carriage geometry.
    pub winding: WindingExcitation,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            array: MagnetArrayConfig::default(),
            grid: GridRegion {
                x_min: -11.0,
                x_max: 11.0,
                y_min: -4.0,
                y_max: 4.0,
                cells_x: 440,
                cells_y: 320,
            },
            wire_current: 10.0,
            conductor_velocity: 2.0,
            conductor_length: 1.0,
            probe_height: 1.0,
            frame_count: 200,
            winding: WindingExcitation::default(),
        }
    }
}

impl SimulationConfig {
    /// Loads a configuration from a YAML file and validates it.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Fails fast on any parameter outside its documented domain, before any
    /// field evaluation is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.array.validate()?;
        self.grid.validate()?;
        if self.frame_count == 0 {
            return Err(ConfigError::NoFrames);
        }
        Ok(())
    }
}
