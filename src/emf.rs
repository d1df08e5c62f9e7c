//! Motional EMF induced on moving conductors.

use crate::conductor::Velocity;
use crate::magnetic::{FieldMap, MagneticFieldSampler};
use nalgebra::Vector2;
use specs::{Component, Read, ReadStorage, System, VecStorage, WriteStorage};
use std::fmt;

/// Resource holding the reference length of the moving conductor.
pub struct ConductorLength {
    pub value: f64,
}

impl Default for ConductorLength {
    fn default() -> Self {
        ConductorLength { value: 1.0 }
    }
}

/// Component storing the EMF induced on an entity this frame.
///
/// The value is overwritten every dispatch; accumulating a trace across
/// frames is the caller's fold over per-frame outputs.
#[derive(Clone, Copy, Default, Component)]
#[storage(VecStorage)]
pub struct InducedEmfSampler {
    pub emf: f64,
}

impl fmt::Display for InducedEmfSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.emf)
    }
}

/// Calculates the motional EMF on a conductor aligned with x, moving in x.
///
/// Quasi-static 1-D reduction of `v x B`: only the field's y component and
/// the conductor's x velocity enter, `emf = v_x * By * L`. The field sample
/// is taken at the conductor's current position by the caller.
///
/// # Arguments
///
/// `field_y`: y component of the field at the conductor.
///
/// `velocity_x`: x velocity of the conductor.
///
/// `conductor_length`: length of the conductor.
pub fn calculate_emf(field_y: f64, velocity_x: f64, conductor_length: f64) -> f64 {
    velocity_x * field_y * conductor_length
}

/// Calculates the induced EMF for every moving conductor with a sampler.
pub struct CalculateInducedEmfSystem;

impl<'a> System<'a> for CalculateInducedEmfSystem {
    type SystemData = (
        WriteStorage<'a, InducedEmfSampler>,
        ReadStorage<'a, MagneticFieldSampler>,
        ReadStorage<'a, Velocity>,
        Read<'a, ConductorLength>,
    );

    fn run(&mut self, (mut emf, sampler, velocity, length): Self::SystemData) {
        use rayon::prelude::*;
        use specs::ParJoin;

        let conductor_length = length.value;
        (&mut emf, &sampler, &velocity)
            .par_join()
            .for_each(|(emf, sampler, velocity)| {
                emf.emf = calculate_emf(sampler.field.y, velocity.vel.x, conductor_length);
            });
    }
}

/// EMF of a probe conductor swept across positions at a fixed velocity.
///
/// Produces one EMF value per probe, ordered like `probes`; this is the
/// voltage-trace pass of the animation sequence.
pub fn sweep_emf<F: FieldMap>(
    field: &F,
    probes: &[Vector2<f64>],
    velocity_x: f64,
    conductor_length: f64,
) -> Vec<f64> {
    probes
        .iter()
        .map(|probe| calculate_emf(field.field_at(*probe).y, velocity_x, conductor_length))
        .collect()
}
