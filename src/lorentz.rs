//! Lorentz force on current-carrying conductors.

use crate::conductor::{Current, Force};
use crate::magnetic::{FieldMap, MagneticFieldSampler};
use nalgebra::Vector2;
use specs::{ReadStorage, System, WriteStorage};

/// Calculates the planar Lorentz force on a unit-length conductor.
///
/// The conductor is aligned with the out-of-plane axis and positive current
/// flows into the page, which reduces `F = I * (L x B)` to
/// `(Fx, Fy) = (I * By, -I * Bx)`.
///
/// # Arguments
///
/// `field`: field sample at the conductor position.
///
/// `current`: signed current carried by the conductor.
pub fn calculate_force(field: Vector2<f64>, current: f64) -> Vector2<f64> {
    Vector2::new(current * field.y, -current * field.x)
}

/// Adds the Lorentz force to every conductor carrying a current.
///
/// Each conductor reads the field from its own sampler; a mirrored return
/// conductor therefore gets an independently evaluated field rather than the
/// negation of its partner's, since the magnets need not be symmetric about
/// y = 0.
pub struct ApplyLorentzForceSystem;

impl<'a> System<'a> for ApplyLorentzForceSystem {
    type SystemData = (
        WriteStorage<'a, Force>,
        ReadStorage<'a, MagneticFieldSampler>,
        ReadStorage<'a, Current>,
    );

    fn run(&mut self, (mut force, sampler, current): Self::SystemData) {
        use rayon::prelude::*;
        use specs::ParJoin;

        (&mut force, &sampler, &current)
            .par_join()
            .for_each(|(force, sampler, current)| {
                force.force += calculate_force(sampler.field, current.value);
            });
    }
}

/// Force on a single conductor swept across a sequence of probe positions.
///
/// Used for the conductor-pass animation: one wire of fixed current is moved
/// along a line and the force at each probe is handed to the renderer.
pub fn sweep_force<F: FieldMap>(
    field: &F,
    probes: &[Vector2<f64>],
    current: f64,
) -> Vec<Vector2<f64>> {
    probes
        .iter()
        .map(|probe| calculate_force(field.field_at(*probe), current))
        .collect()
}
