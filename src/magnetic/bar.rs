//! Bar magnets modeled as paired monopoles.

extern crate nalgebra;
extern crate specs;
use crate::conductor::Position;
use crate::magnetic::{monopole, MagneticFieldSampler};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use specs::{Component, HashMapStorage, Join, ReadStorage, System, WriteStorage};

/// A component representing a physical bar magnet.
///
/// The magnet is a rectangle of the given length and height, centered on
/// `y = 0`, starting at `start_x`. Its field is that of two opposite
/// monopoles inset from the rectangle ends: the north pole carries
/// `+strength`, the south pole `-strength`.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct BarMagnet {
    /// x-coordinate of the left edge of the magnet rectangle.
    pub start_x: f64,
    /// Length of the rectangle along x.
    pub length: f64,
    /// Height of the rectangle; the magnet is centered on y = 0.
    pub height: f64,
    /// Position of the north (positive) monopole.
    pub north: Vector2<f64>,
    /// Position of the south (negative) monopole.
    pub south: Vector2<f64>,
    /// Pole strength; the north pole is always the positive monopole.
    pub strength: f64,
}

impl BarMagnet {
    /// x-coordinate of the right edge of the magnet rectangle.
    pub fn end_x(&self) -> f64 {
        self.start_x + self.length
    }

    /// Field contribution of this magnet: the superposition of its north
    /// and south monopoles. Pure superposition, no other logic.
    pub fn field_at(&self, point: Vector2<f64>) -> Vector2<f64> {
        monopole::field_at(point, self.north, self.strength)
            + monopole::field_at(point, self.south, -self.strength)
    }
}

impl Component for BarMagnet {
    type Storage = HashMapStorage<Self>;
}

/// Updates the values of magnetic field samplers to include the fields of
/// all bar magnets in the world.
pub struct SampleBarMagnetFieldSystem;

impl<'a> System<'a> for SampleBarMagnetFieldSystem {
    type SystemData = (
        WriteStorage<'a, MagneticFieldSampler>,
        ReadStorage<'a, Position>,
        ReadStorage<'a, BarMagnet>,
    );

    fn run(&mut self, (mut sampler, pos, magnets): Self::SystemData) {
        use rayon::prelude::*;
        use specs::ParJoin;

        for magnet in (&magnets).join() {
            (&pos, &mut sampler).par_join().for_each(|(pos, sampler)| {
                sampler.field += magnet.field_at(pos.pos);
            });
        }
    }
}
