//! Error types for configuration validation and boundary I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("array must contain at least one magnet")]
    NoMagnets,

    #[error("magnet strength must be nonzero")]
    ZeroStrength,

    #[error("magnet length must be positive, got {0}")]
    NonPositiveLength(f64),

    #[error("magnet height must be positive, got {0}")]
    NonPositiveHeight(f64),

    #[error("gap between magnets must not be negative, got {0}")]
    NegativeGap(f64),

    #[error("dipole inset must lie in (0, length/2); got inset {inset} for length {length}")]
    InvalidDipoleInset { inset: f64, length: f64 },

    #[error("grid region must have positive extent and at least two samples per axis")]
    DegenerateGrid,

    #[error("frame count must be at least 1")]
    NoFrames,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
