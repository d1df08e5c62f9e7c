//! Precalculated field grids.
//!
//! A [PrecalculatedFieldGrid] holds the superposed field evaluated once over
//! a regular grid. It serves two consumers: the rendering collaborator, which
//! takes the whole grid for stream plots, and probe lookups, which read the
//! nearest sample instead of re-evaluating the superposition.

use crate::error::ConfigError;
use crate::magnetic::array::MagnetArray;
use crate::magnetic::FieldMap;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Rectangular sampling region of the plane.
///
/// Samples sit on a regular grid of `cells_x` columns and `cells_y` rows,
/// inclusive of both boundary coordinates on each axis.
#[derive(Clone, Serialize, Deserialize)]
pub struct GridRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub cells_x: usize,
    pub cells_y: usize,
}

impl GridRegion {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.x_max > self.x_min)
            || !(self.y_max > self.y_min)
            || self.cells_x < 2
            || self.cells_y < 2
        {
            return Err(ConfigError::DegenerateGrid);
        }
        Ok(())
    }

    /// Spacing between neighbouring samples along each axis.
    pub fn spacing(&self) -> (f64, f64) {
        (
            (self.x_max - self.x_min) / (self.cells_x - 1) as f64,
            (self.y_max - self.y_min) / (self.cells_y - 1) as f64,
        )
    }

    pub fn x_at(&self, ix: usize) -> f64 {
        let (dx, _) = self.spacing();
        self.x_min + ix as f64 * dx
    }

    pub fn y_at(&self, iy: usize) -> f64 {
        let (_, dy) = self.spacing();
        self.y_min + iy as f64 * dy
    }

    pub fn point_at(&self, ix: usize, iy: usize) -> Vector2<f64> {
        Vector2::new(self.x_at(ix), self.y_at(iy))
    }
}

/// Result of a nearest-sample lookup.
///
/// `out_of_range` marks probes that fell outside the sampled region by more
/// than half a grid spacing and were clamped to the boundary sample.
#[derive(Clone, Copy, Debug)]
pub struct GridLookup {
    pub ix: usize,
    pub iy: usize,
    pub out_of_range: bool,
}

/// A field evaluated once over a regular grid.
///
/// The grid is ordered as a linear array with x fastest: the sample at
/// `(ix, iy)` sits at index `iy * cells_x + ix`.
#[derive(Serialize, Deserialize)]
pub struct PrecalculatedFieldGrid {
    pub region: GridRegion,
    pub field: Vec<Vector2<f64>>,
}

impl PrecalculatedFieldGrid {
    /// Evaluates the superposed field of `array` over every sample of
    /// `region`, in parallel. The result is identical to the serial
    /// element-wise evaluation.
    pub fn calculate(
        array: &MagnetArray,
        region: &GridRegion,
    ) -> Result<PrecalculatedFieldGrid, ConfigError> {
        use rayon::prelude::*;

        region.validate()?;
        let field = (0..region.cells_x * region.cells_y)
            .into_par_iter()
            .map(|index| {
                let ix = index % region.cells_x;
                let iy = index / region.cells_x;
                array.field_at(region.point_at(ix, iy))
            })
            .collect();
        Ok(PrecalculatedFieldGrid {
            region: region.clone(),
            field,
        })
    }

    /// Indices of the sample nearest to `point`, minimizing the absolute
    /// coordinate distance independently on each axis.
    ///
    /// For probes inside the region the returned sample lies within half a
    /// grid spacing of the probe on each axis; that half spacing is the
    /// discretization error bound of this lookup. Probes beyond the boundary
    /// by more than half a spacing are clamped to the boundary sample and
    /// flagged, never extrapolated.
    pub fn nearest_index(&self, point: Vector2<f64>) -> GridLookup {
        let region = &self.region;
        let (dx, dy) = region.spacing();

        let ix = ((point.x - region.x_min) / dx)
            .round()
            .max(0.0)
            .min((region.cells_x - 1) as f64) as usize;
        let iy = ((point.y - region.y_min) / dy)
            .round()
            .max(0.0)
            .min((region.cells_y - 1) as f64) as usize;

        let out_of_range = point.x < region.x_min - dx / 2.0
            || point.x > region.x_max + dx / 2.0
            || point.y < region.y_min - dy / 2.0
            || point.y > region.y_max + dy / 2.0;
        if out_of_range {
            log::warn!(
                "probe ({:.3}, {:.3}) lies outside the sampled region; clamped to boundary sample",
                point.x,
                point.y
            );
        }

        GridLookup {
            ix,
            iy,
            out_of_range,
        }
    }

    /// Worst-case distance, per axis, between an in-region probe and the
    /// sample returned by [nearest_index](PrecalculatedFieldGrid::nearest_index):
    /// half the grid spacing.
    pub fn error_bound(&self) -> (f64, f64) {
        let (dx, dy) = self.region.spacing();
        (dx / 2.0, dy / 2.0)
    }

    /// Field of the sample nearest to `point`.
    pub fn get_field(&self, point: Vector2<f64>) -> Vector2<f64> {
        let lookup = self.nearest_index(point);
        self.field[lookup.iy * self.region.cells_x + lookup.ix]
    }

    /// Writes the grid as JSON for the rendering collaborator.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    /// Reads a grid previously written with
    /// [to_json_file](PrecalculatedFieldGrid::to_json_file).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<PrecalculatedFieldGrid, ConfigError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

impl FieldMap for PrecalculatedFieldGrid {
    fn field_at(&self, point: Vector2<f64>) -> Vector2<f64> {
        self.get_field(point)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::magnetic::array::MagnetArrayConfig;

    fn small_grid() -> PrecalculatedFieldGrid {
        let array = MagnetArray::build(&MagnetArrayConfig {
            n_magnets: 2,
            ..MagnetArrayConfig::default()
        })
        .expect("valid config");
        let region = GridRegion {
            x_min: -4.0,
            x_max: 4.0,
            y_min: -2.0,
            y_max: 2.0,
            cells_x: 81,
            cells_y: 41,
        };
        PrecalculatedFieldGrid::calculate(&array, &region).expect("valid region")
    }

    #[test]
    fn test_grid_matches_direct_evaluation() {
        let array = MagnetArray::build(&MagnetArrayConfig {
            n_magnets: 2,
            ..MagnetArrayConfig::default()
        })
        .expect("valid config");
        let grid = small_grid();

        let region = &grid.region;
        let index = 7 * region.cells_x + 13;
        assert_eq!(grid.field[index], array.field_at(region.point_at(13, 7)));
    }

    #[test]
    fn test_nearest_index_at_exact_sample() {
        let grid = small_grid();
        let lookup = grid.nearest_index(grid.region.point_at(12, 30));
        assert_eq!((lookup.ix, lookup.iy), (12, 30));
        assert!(!lookup.out_of_range);
    }

    #[test]
    fn test_nearest_index_rounds_to_closest_sample() {
        let grid = small_grid();
        let (dx, dy) = grid.region.spacing();
        // a probe offset by 40% of the spacing still maps to the same sample
        let probe = grid.region.point_at(5, 5) + Vector2::new(0.4 * dx, -0.4 * dy);
        let lookup = grid.nearest_index(probe);
        assert_eq!((lookup.ix, lookup.iy), (5, 5));
        assert!(!lookup.out_of_range);

        // the probe sits within the documented error bound of its sample
        let (bx, by) = grid.error_bound();
        assert!((probe.x - grid.region.x_at(lookup.ix)).abs() <= bx);
        assert!((probe.y - grid.region.y_at(lookup.iy)).abs() <= by);
    }

    #[test]
    fn test_out_of_range_probe_is_clamped_and_flagged() {
        let grid = small_grid();
        let lookup = grid.nearest_index(Vector2::new(100.0, -50.0));
        assert_eq!(lookup.ix, grid.region.cells_x - 1);
        assert_eq!(lookup.iy, 0);
        assert!(lookup.out_of_range);

        // a clamped probe still returns the boundary sample, not an
        // extrapolated value
        let expected = grid.field[lookup.iy * grid.region.cells_x + lookup.ix];
        assert_eq!(grid.get_field(Vector2::new(100.0, -50.0)), expected);
    }

    #[test]
    fn test_degenerate_region_is_rejected() {
        let array = MagnetArray::build(&MagnetArrayConfig::default()).expect("valid config");
        let region = GridRegion {
            x_min: 1.0,
            x_max: 1.0,
            y_min: -2.0,
            y_max: 2.0,
            cells_x: 10,
            cells_y: 10,
        };
        assert!(matches!(
            PrecalculatedFieldGrid::calculate(&array, &region),
            Err(ConfigError::DegenerateGrid)
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let grid = small_grid();
        let path = std::env::temp_dir().join("linmag_grid_round_trip.json");
        grid.to_json_file(&path).expect("grid written");
        let read_back = PrecalculatedFieldGrid::from_json_file(&path).expect("grid read");
        std::fs::remove_file(&path).ok();

        assert_eq!(read_back.region.cells_x, grid.region.cells_x);
        assert_eq!(read_back.region.cells_y, grid.region.cells_y);
        assert_eq!(read_back.field, grid.field);
    }
}
