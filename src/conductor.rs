//! Components for current-carrying conductors.
//!
//! Conductors are the entities the field acts on: each carries a signed
//! current along the out-of-plane axis and accumulates the resulting planar
//! force. They are rebuilt from configuration every frame and hold no state
//! of their own across frames.

extern crate specs;
use nalgebra::Vector2;
use specs::{Component, Join, NullStorage, ReadStorage, System, VecStorage, Write, WriteStorage};
use std::fmt;

/// Position of an entity in the plane, with respect to cartesian x,y axes.
#[derive(Clone, Copy)]
pub struct Position {
    pub pos: Vector2<f64>,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

impl Default for Position {
    fn default() -> Self {
        Position {
            pos: Vector2::zeros(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?},{:?})", self.pos.x, self.pos.y)
    }
}

/// Velocity of an entity in the plane.
#[derive(Clone, Copy)]
pub struct Velocity {
    pub vel: Vector2<f64>,
}

impl Component for Velocity {
    type Storage = VecStorage<Self>;
}

/// Force applied to an entity, with respect to cartesian x,y axes.
#[derive(Clone, Copy)]
pub struct Force {
    pub force: Vector2<f64>,
}

impl Component for Force {
    type Storage = VecStorage<Self>;
}

impl Default for Force {
    fn default() -> Self {
        Force {
            force: Vector2::zeros(),
        }
    }
}

impl fmt::Display for Force {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?},{:?})", self.force.x, self.force.y)
    }
}

/// Signed current carried by a conductor.
///
/// The conductor is aligned with the out-of-plane axis; positive current
/// flows into the page. The sign flips both components of the Lorentz force.
#[derive(Clone, Copy)]
pub struct Current {
    pub value: f64,
}

impl Component for Current {
    type Storage = VecStorage<Self>;
}

/// Marker component for conductor entities.
#[derive(Default)]
pub struct Conductor;

impl Component for Conductor {
    type Storage = NullStorage<Self>;
}

/// Resource holding the net force summed over all conductors this frame.
#[derive(Clone, Copy)]
pub struct NetForce {
    pub force: Vector2<f64>,
}

impl Default for NetForce {
    fn default() -> Self {
        NetForce {
            force: Vector2::zeros(),
        }
    }
}

/// Resets forces to zero at the start of each frame.
pub struct ClearForceSystem;

impl<'a> System<'a> for ClearForceSystem {
    type SystemData = WriteStorage<'a, Force>;
    fn run(&mut self, mut force: Self::SystemData) {
        use rayon::prelude::*;
        use specs::ParJoin;

        (&mut force).par_join().for_each(|force| {
            force.force = Vector2::zeros();
        });
    }
}

/// Sums the forces on all conductor entities into the [NetForce] resource.
///
/// This is the quantity that drives the winding carriage. Only entities
/// marked with [Conductor] contribute.
pub struct SumNetForceSystem;

impl<'a> System<'a> for SumNetForceSystem {
    type SystemData = (
        Write<'a, NetForce>,
        ReadStorage<'a, Force>,
        ReadStorage<'a, Conductor>,
    );

    fn run(&mut self, (mut net, force, conductor): Self::SystemData) {
        let mut total = Vector2::zeros();
        for (force, _) in (&force, &conductor).join() {
            total += force.force;
        }
        net.force = total;
    }
}

/// Registers components required by conductors to the ecs world.
pub fn register_components(world: &mut specs::World) {
    use specs::WorldExt;
    world.register::<Position>();
    world.register::<Velocity>();
    world.register::<Force>();
    world.register::<Current>();
    world.register::<Conductor>();
}
