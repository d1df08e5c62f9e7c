//! Registration and dispatcher construction for the frame pipeline.

use crate::conductor::{ClearForceSystem, NetForce, SumNetForceSystem};
use crate::emf::{CalculateInducedEmfSystem, ConductorLength};
use crate::frame::{FrameStep, NormalizedTime};
use crate::initiate::DeflagNewConductorsSystem;
use crate::lorentz::ApplyLorentzForceSystem;
use crate::magnetic;
use crate::winding::{UpdateWindingSystem, WindingExcitation, UPDATE_WINDING_SYSTEM_NAME};
use specs::{DispatcherBuilder, World, WorldExt};

/// Registers all components used by the modules of the crate.
pub fn register_components(world: &mut World) {
    crate::conductor::register_components(world);
    magnetic::register_components(world);
    crate::winding::register_components(world);
    world.register::<crate::initiate::NewlyCreated>();
    world.register::<crate::emf::InducedEmfSampler>();
}

/// Adds the resources required by the frame pipeline to the world.
pub fn register_resources(world: &mut World) {
    world.insert(NormalizedTime::default());
    world.insert(FrameStep::default());
    world.insert(NetForce::default());
    world.insert(ConductorLength::default());
    world.insert(WindingExcitation::default());
}

/// Selects the frame computed by the next dispatch.
///
/// Frames are pure functions of their index: nothing inside the dispatch
/// advances time, so frames can be selected in any order, repeated, or
/// distributed across worlds.
pub fn set_frame(world: &mut World, index: u64, total_frames: u64) {
    world.insert(FrameStep { n: index });
    world.insert(NormalizedTime {
        t: index as f64 / total_frames as f64,
    });
}

/// Creates a `DispatcherBuilder` that computes one animation frame per dispatch.
///
/// The pipeline clears per-frame state, lays out the winding for the selected
/// time, superposes the magnet fields at every conductor, then derives the
/// Lorentz forces, induced EMF and net carriage force.
pub fn create_frame_dispatcher_builder() -> DispatcherBuilder<'static, 'static> {
    let mut builder = DispatcherBuilder::new();
    builder.add(ClearForceSystem, "clear_forces", &[]);
    builder.add(DeflagNewConductorsSystem, "deflag", &[]);
    builder.add(UpdateWindingSystem, UPDATE_WINDING_SYSTEM_NAME, &[]);
    builder.add_barrier();
    magnetic::add_systems_to_dispatch(&mut builder, &[]);
    builder.add_barrier();
    builder.add(ApplyLorentzForceSystem, "lorentz_force", &[]);
    builder.add(CalculateInducedEmfSystem, "induced_emf", &[]);
    builder.add_barrier();
    builder.add(SumNetForceSystem, "sum_net_force", &[]);
    builder
}
