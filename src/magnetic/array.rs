//! Laying out arrays of bar magnets along the x axis.

extern crate specs;
use crate::error::ConfigError;
use crate::magnetic::bar::BarMagnet;
use crate::magnetic::FieldMap;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use specs::{Builder, World, WorldExt};

/// Parameters for building a [MagnetArray].
#[derive(Clone, Serialize, Deserialize)]
pub struct MagnetArrayConfig {
    /// Number of magnets placed along the x axis.
    pub n_magnets: usize,
    /// Length of each magnet along x.
    pub length: f64,
    /// Uniform gap between neighbouring magnets.
    pub gap: f64,
    /// Height of each magnet rectangle.
    pub height: f64,
    /// Distance from each magnet end to the monopole inset inside it.
    /// Must lie in `(0, length/2)`.
    pub dipole_inset: f64,
    /// Pole strength of each magnet.
    pub strength: f64,
    /// Alternate the polarity of odd-indexed magnets.
    pub reverse_every_other: bool,
}

impl Default for MagnetArrayConfig {
    fn default() -> Self {
        MagnetArrayConfig {
            n_magnets: 8,
            length: 2.0,
            gap: 0.0,
            height: 0.5,
            dipole_inset: 0.2,
            strength: 5.0,
            reverse_every_other: true,
        }
    }
}

impl MagnetArrayConfig {
    /// Fails fast on parameters that would produce a meaningless layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_magnets == 0 {
            return Err(ConfigError::NoMagnets);
        }
        if self.strength == 0.0 {
            return Err(ConfigError::ZeroStrength);
        }
        if self.length <= 0.0 {
            return Err(ConfigError::NonPositiveLength(self.length));
        }
        if self.height <= 0.0 {
            return Err(ConfigError::NonPositiveHeight(self.height));
        }
        if self.gap < 0.0 {
            return Err(ConfigError::NegativeGap(self.gap));
        }
        if self.dipole_inset <= 0.0 || self.dipole_inset >= self.length / 2.0 {
            return Err(ConfigError::InvalidDipoleInset {
                inset: self.dipole_inset,
                length: self.length,
            });
        }
        Ok(())
    }
}

/// An immutable, ordered sequence of bar magnets centered on x = 0.
///
/// The order is the physical left-to-right placement. It matters only for
/// deterministic rendering; the field superposition is commutative.
#[derive(Clone, Serialize, Deserialize)]
pub struct MagnetArray {
    magnets: Vec<BarMagnet>,
    total_length: f64,
}

impl MagnetArray {
    /// Builds the array from a validated configuration.
    ///
    /// The array spans `n*length + (n-1)*gap` and is shifted so its midpoint
    /// sits at x = 0. Magnet `i` starts at `i*(length+gap) - center_shift`;
    /// its poles are inset from the rectangle ends, with north on the left
    /// unless `reverse_every_other` is set and `i` is odd.
    pub fn build(config: &MagnetArrayConfig) -> Result<MagnetArray, ConfigError> {
        config.validate()?;

        let n = config.n_magnets;
        let total_length = n as f64 * config.length + (n as f64 - 1.0) * config.gap;
        let center_shift = total_length / 2.0;

        let mut magnets = Vec::with_capacity(n);
        for i in 0..n {
            let start_x = i as f64 * (config.length + config.gap) - center_shift;
            let end_x = start_x + config.length;
            let (north_x, south_x) = if config.reverse_every_other && i % 2 == 1 {
                (end_x - config.dipole_inset, start_x + config.dipole_inset)
            } else {
                (start_x + config.dipole_inset, end_x - config.dipole_inset)
            };
            magnets.push(BarMagnet {
                start_x,
                length: config.length,
                height: config.height,
                north: Vector2::new(north_x, 0.0),
                south: Vector2::new(south_x, 0.0),
                strength: config.strength,
            });
        }

        log::info!(
            "built magnet array: {} magnets spanning {:.3}",
            n,
            total_length
        );
        Ok(MagnetArray {
            magnets,
            total_length,
        })
    }

    /// Builds an array directly from a list of magnets, e.g. to combine two
    /// existing arrays into one.
    pub fn from_magnets(magnets: Vec<BarMagnet>) -> MagnetArray {
        let total_length = match (
            magnets
                .iter()
                .map(|m| m.start_x)
                .fold(f64::INFINITY, f64::min),
            magnets
                .iter()
                .map(|m| m.end_x())
                .fold(f64::NEG_INFINITY, f64::max),
        ) {
            (min, max) if min.is_finite() && max.is_finite() => max - min,
            _ => 0.0,
        };
        MagnetArray {
            magnets,
            total_length,
        }
    }

    pub fn magnets(&self) -> &[BarMagnet] {
        &self.magnets
    }

    /// Total span of the array along x, including gaps.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Superposed field of every magnet at one point, as a pure fold.
    pub fn field_at(&self, point: Vector2<f64>) -> Vector2<f64> {
        self.magnets
            .iter()
            .fold(Vector2::zeros(), |acc, magnet| acc + magnet.field_at(point))
    }

    /// Superposed field over an arbitrary point set, evaluated in parallel.
    ///
    /// Element-wise semantics are identical to [field_at](MagnetArray::field_at);
    /// the point set may be a handful of probes or a dense grid.
    pub fn fields_of(&self, points: &[Vector2<f64>]) -> Vec<Vector2<f64>> {
        use rayon::prelude::*;
        points.par_iter().map(|p| self.field_at(*p)).collect()
    }

    /// Creates one entity per magnet so the ECS systems can sample the array.
    pub fn spawn(&self, world: &mut World) {
        for magnet in &self.magnets {
            world.create_entity().with(*magnet).build();
        }
    }
}

impl FieldMap for MagnetArray {
    fn field_at(&self, point: Vector2<f64>) -> Vector2<f64> {
        MagnetArray::field_at(self, point)
    }
}
