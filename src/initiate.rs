//! A module responsible for initiating newly created conductors.
//!
//! When new conductors are added to the world, a [NewlyCreated](struct.NewlyCreated.html)
//! component is attached. This provides a signal that modules can use to identify which
//! entities are new, and thus to attach any required components. For instance, the
//! `magnetic` module attaches a [MagneticFieldSampler](struct.MagneticFieldSampler.html)
//! to new conductors so that the field systems can calculate samples at their locations.
//!
//! This module defines the [NewlyCreated](struct.NewlyCreated.html) component, and also the
//! [DeflagNewConductorsSystem](struct.DeflagNewConductorsSystem.html) which is responsible
//! for cleaning up these components each frame.

use specs::prelude::*;

/// A marker component that indicates an entity has been `NewlyCreated`.
///
/// The main use of this component is to allow different modules to identify when a
/// conductor has been created and to attach any appropriate components required.
#[derive(Component, Default)]
#[storage(NullStorage)]
pub struct NewlyCreated;

/// This system is responsible for removing the `NewlyCreated` marker component.
///
/// The marker is originally added to conductors when they are first added to the world,
/// which allows other systems to add any required components to them.
///
/// ## When should this system run?
///
/// This system runs *before* new conductors are added to the world.
/// Thus, any entities flagged as `NewlyCreated` from the previous frame are deflagged
/// before newly flagged entities are created. LazyUpdate is used, so the removal is only
/// enacted after the call to `world.maintain()`.
pub struct DeflagNewConductorsSystem;

impl<'a> System<'a> for DeflagNewConductorsSystem {
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, NewlyCreated>,
        Read<'a, LazyUpdate>,
    );

    fn run(&mut self, (ent, newly_created, updater): Self::SystemData) {
        for (ent, _newly_created) in (&ent, &newly_created).join() {
            updater.remove::<NewlyCreated>(ent);
        }
    }
}
