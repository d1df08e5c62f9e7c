//! Magnetic fields and field samplers

extern crate nalgebra;
extern crate specs;
use crate::initiate::NewlyCreated;
use nalgebra::Vector2;
use specs::{
    Component, DispatcherBuilder, Entities, Join, LazyUpdate, Read, ReadStorage, System,
    VecStorage, World, WorldExt, WriteStorage,
};

pub mod array;
pub mod bar;
pub mod grid;
pub mod monopole;
use std::fmt;

/// A component that stores the magnetic field at an entity's location.
#[derive(Copy, Clone)]
pub struct MagneticFieldSampler {
    /// Vector representing the magnetic field components along x,y.
    pub field: Vector2<f64>,

    /// Magnitude of the magnetic field
    pub magnitude: f64,
}

impl MagneticFieldSampler {
    pub fn new(field: Vector2<f64>) -> Self {
        MagneticFieldSampler {
            field,
            magnitude: field.norm(),
        }
    }
}

impl Component for MagneticFieldSampler {
    type Storage = VecStorage<Self>;
}

impl fmt::Display for MagneticFieldSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?},{:?})", self.field.x, self.field.y)
    }
}

impl Default for MagneticFieldSampler {
    fn default() -> Self {
        MagneticFieldSampler {
            field: Vector2::new(0.0, 0.0),
            magnitude: 0.0,
        }
    }
}

/// Maps a position in the plane to a field sample.
///
/// This is the seam between field producers and consumers: force and EMF
/// calculations accept any implementor, whether the exact superposition of a
/// [MagnetArray](array::MagnetArray) or the nearest-sample lookup of a
/// [PrecalculatedFieldGrid](grid::PrecalculatedFieldGrid).
pub trait FieldMap {
    fn field_at(&self, point: Vector2<f64>) -> Vector2<f64>;
}

/// System that clears the magnetic field samplers each frame.
pub struct ClearMagneticFieldSamplerSystem;

impl<'a> System<'a> for ClearMagneticFieldSamplerSystem {
    type SystemData = WriteStorage<'a, MagneticFieldSampler>;
    fn run(&mut self, mut sampler: Self::SystemData) {
        use rayon::prelude::*;
        use specs::ParJoin;

        (&mut sampler).par_join().for_each(|sampler| {
            sampler.magnitude = 0.;
            sampler.field = Vector2::new(0.0, 0.0)
        });
    }
}

/// System that calculates the magnitude of the magnetic field.
///
/// The magnitude is used by downstream consumers and the rendering hand-off,
/// so it is calculated once and cached in the sampler. This system runs after
/// all field contributions have been summed.
pub struct CalculateMagneticFieldMagnitudeSystem;

impl<'a> System<'a> for CalculateMagneticFieldMagnitudeSystem {
    type SystemData = WriteStorage<'a, MagneticFieldSampler>;
    fn run(&mut self, mut sampler: Self::SystemData) {
        use rayon::prelude::*;
        use specs::ParJoin;

        (&mut sampler).par_join().for_each(|sampler| {
            sampler.magnitude = sampler.field.norm();
            if sampler.magnitude.is_nan() {
                sampler.magnitude = 0.0;
            }
        });
    }
}

/// Attaches the MagneticFieldSampler component to newly created conductors.
///
/// This allows other magnetic systems to interact with the conductor, eg to
/// calculate the field at its location.
pub struct AttachFieldSamplersToNewlyCreatedConductorsSystem;

impl<'a> System<'a> for AttachFieldSamplersToNewlyCreatedConductorsSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, NewlyCreated>,
        Read<'a, LazyUpdate>,
    );
    fn run(&mut self, (ent, newly_created, updater): Self::SystemData) {
        for (ent, _nc) in (&ent, &newly_created).join() {
            updater.insert(ent, MagneticFieldSampler::default());
        }
    }
}

/// Adds the systems required by magnetics to the dispatcher.
///
/// #Arguments
///
/// `builder`: the dispatch builder to modify
///
/// `deps`: any dependencies that must be completed before the magnetics systems run.
pub fn add_systems_to_dispatch(builder: &mut DispatcherBuilder<'static, 'static>, deps: &[&str]) {
    builder.add(ClearMagneticFieldSamplerSystem, "magnetics_clear", deps);
    builder.add(
        bar::SampleBarMagnetFieldSystem,
        "magnetics_bar",
        &["magnetics_clear"],
    );
    builder.add(
        CalculateMagneticFieldMagnitudeSystem,
        "magnetics_magnitude",
        &["magnetics_bar"],
    );
    builder.add(
        AttachFieldSamplersToNewlyCreatedConductorsSystem,
        "add_magnetic_field_samplers",
        &[],
    );
}

/// Registers components required by magnetics to the ecs world.
pub fn register_components(world: &mut World) {
    world.register::<bar::BarMagnet>();
    world.register::<MagneticFieldSampler>();
}
