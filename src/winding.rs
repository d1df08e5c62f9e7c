//! Three-phase winding excitation and the moving conductor carriage.
//!
//! The carriage is an assembly of six conductors: three forward conductors
//! carrying the phase currents at `y = +h` and three mirrored return
//! conductors at `y = -h` carrying the negated currents. The carriage
//! translates linearly across the magnet array as the normalized time runs
//! from 0 to 1, while the phase currents advance with the electrical angle.
//!
//! Every frame is a pure function of `t`: the same `t` always yields the
//! same geometry, currents and forces, so frames may be generated out of
//! order or in parallel.

use crate::conductor::{Conductor, Current, Force, Position};
use crate::constant::{DEFAULT_ANGULAR_RATE, DEFAULT_PHASE_OFFSET};
use crate::frame::NormalizedTime;
use crate::lorentz;
use crate::magnetic::{FieldMap, MagneticFieldSampler};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use specs::{
    Builder, Component, Entity, HashMapStorage, Join, Read, ReadStorage, System, World, WorldExt,
    WriteStorage,
};

pub const UPDATE_WINDING_SYSTEM_NAME: &str = "winding_update";

/// Number of conductors in the carriage: three forward, three return.
pub const WINDING_CONDUCTORS: usize = 6;

/// Balanced three-phase currents at one electrical angle.
#[derive(Clone, Copy, Debug)]
pub struct PhaseCurrents {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// One conductor of the winding at a given frame.
#[derive(Clone, Copy, Debug)]
pub struct WindingConductor {
    pub position: Vector2<f64>,
    pub current: f64,
    pub force: Vector2<f64>,
}

/// Axis-aligned bounding rectangle of the carriage.
#[derive(Clone, Copy, Debug)]
pub struct CarriageGeometry {
    pub center: Vector2<f64>,
    pub half_width: f64,
    pub half_height: f64,
}

/// Snapshot of the winding at one normalized time.
///
/// Recomputed fresh per frame, never mutated; handed to the rendering
/// collaborator for conductor markers, force arrows and the carriage box.
pub struct WindingFrame {
    pub t: f64,
    /// Electrical angle driving the phase currents. Distinct from any
    /// physical rotation; the carriage translates, it does not rotate.
    pub theta: f64,
    pub currents: PhaseCurrents,
    pub conductors: Vec<WindingConductor>,
    pub carriage: CarriageGeometry,
    /// Sum of the Lorentz forces on all six conductors.
    pub net_force: Vector2<f64>,
}

/// Immutable excitation and carriage configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct WindingExcitation {
    /// Amplitude of each phase current.
    pub current_amplitude: f64,
    /// Electrical angle advanced per unit of normalized time.
    pub angular_rate: f64,
    /// Phase separation between the three currents. The default `2*pi/3`
    /// keeps the set balanced: `IA + IB + IC = 0` for every angle.
    pub phase_offset: f64,
    /// Height `h` of the forward conductors; returns run at `-h`.
    pub conductor_height: f64,
    /// Spacing between neighbouring conductor slots.
    pub conductor_spacing: f64,
    /// Carriage center x at `t = 0`.
    pub carriage_start_x: f64,
    /// Distance the carriage travels along x as `t` runs 0 to 1.
    pub carriage_travel: f64,
    /// Half extent of the carriage rectangle along x.
    pub carriage_half_width: f64,
    /// Half extent of the carriage rectangle along y.
    pub carriage_half_height: f64,
}

impl Default for WindingExcitation {
    fn default() -> Self {
        WindingExcitation {
            current_amplitude: 10.0,
            angular_rate: DEFAULT_ANGULAR_RATE,
            phase_offset: DEFAULT_PHASE_OFFSET,
            conductor_height: 1.0,
            conductor_spacing: 2.0 / 3.0,
            carriage_start_x: -4.0,
            carriage_travel: 8.0,
            carriage_half_width: 2.0,
            carriage_half_height: 4.0 / 3.0,
        }
    }
}

impl WindingExcitation {
    /// The three phase currents at electrical angle `theta`.
    pub fn phase_currents(&self, theta: f64) -> PhaseCurrents {
        PhaseCurrents {
            a: self.current_amplitude * (theta - self.phase_offset).sin(),
            b: self.current_amplitude * theta.sin(),
            c: self.current_amplitude * (theta + self.phase_offset).sin(),
        }
    }

    /// Carriage center x position; translates linearly with `t`.
    pub fn carriage_center_x(&self, t: f64) -> f64 {
        self.carriage_start_x + self.carriage_travel * t
    }

    /// Carriage bounding rectangle at `t`.
    pub fn carriage(&self, t: f64) -> CarriageGeometry {
        CarriageGeometry {
            center: Vector2::new(self.carriage_center_x(t), 0.0),
            half_width: self.carriage_half_width,
            half_height: self.carriage_half_height,
        }
    }

    /// Positions and currents of the six conductors at `t`.
    ///
    /// Slots are laid out at fixed offsets `(k - 2.5) * spacing` around the
    /// carriage center. Slots 0..3 are the forward conductors at `+h`
    /// carrying `(IA, IB, IC)`; slots 3..6 are the mirrored returns at `-h`
    /// carrying `(-IA, -IB, -IC)`.
    pub fn conductor_layout(&self, t: f64) -> Vec<(Vector2<f64>, f64)> {
        let cx = self.carriage_center_x(t);
        let currents = self.phase_currents(self.angular_rate * t);
        let phase = [currents.a, currents.b, currents.c];

        let mut layout = Vec::with_capacity(WINDING_CONDUCTORS);
        for k in 0..WINDING_CONDUCTORS {
            let x = cx + (k as f64 - 2.5) * self.conductor_spacing;
            if k < 3 {
                layout.push((Vector2::new(x, self.conductor_height), phase[k]));
            } else {
                layout.push((Vector2::new(x, -self.conductor_height), -phase[k - 3]));
            }
        }
        layout
    }

    /// Computes the full winding frame at normalized time `t`.
    ///
    /// The field is sampled per conductor through `field` (the exact array
    /// superposition or a precomputed grid) and each conductor's Lorentz
    /// force is accumulated into the net force driving the carriage.
    pub fn frame<F: FieldMap>(&self, t: f64, field: &F) -> WindingFrame {
        let theta = self.angular_rate * t;
        let mut conductors = Vec::with_capacity(WINDING_CONDUCTORS);
        let mut net_force = Vector2::zeros();

        for (position, current) in self.conductor_layout(t) {
            let force = lorentz::calculate_force(field.field_at(position), current);
            net_force += force;
            conductors.push(WindingConductor {
                position,
                current,
                force,
            });
        }

        WindingFrame {
            t,
            theta,
            currents: self.phase_currents(theta),
            conductors,
            carriage: self.carriage(t),
            net_force,
        }
    }
}

/// Identifies which of the six winding slots an entity occupies.
#[derive(Clone, Copy, Component)]
#[storage(HashMapStorage)]
pub struct WindingSlot {
    pub index: usize,
}

/// Creates the six conductor entities of the winding carriage.
///
/// Positions and currents are placeholders until the first dispatch of
/// [UpdateWindingSystem] writes the layout for the current frame.
pub fn spawn_winding(world: &mut World) -> Vec<Entity> {
    (0..WINDING_CONDUCTORS)
        .map(|index| {
            world
                .create_entity()
                .with(Conductor)
                .with(WindingSlot { index })
                .with(Position::default())
                .with(Current { value: 0.0 })
                .with(Force::default())
                .with(MagneticFieldSampler::default())
                .build()
        })
        .collect()
}

/// Writes the winding layout for the current frame onto the slot entities.
///
/// Runs before field sampling so forces are evaluated at this frame's
/// conductor positions. Reads only the [NormalizedTime] resource; dispatching
/// twice at the same time yields identical component values.
pub struct UpdateWindingSystem;

impl<'a> System<'a> for UpdateWindingSystem {
    type SystemData = (
        WriteStorage<'a, Position>,
        WriteStorage<'a, Current>,
        ReadStorage<'a, WindingSlot>,
        Read<'a, NormalizedTime>,
        Read<'a, WindingExcitation>,
    );

    fn run(&mut self, (mut pos, mut current, slot, time, excitation): Self::SystemData) {
        let layout = excitation.conductor_layout(time.t);
        for (pos, current, slot) in (&mut pos, &mut current, &slot).join() {
            let (position, value) = layout[slot.index];
            pos.pos = position;
            current.value = value;
        }
    }
}

/// Registers components required by the winding to the ecs world.
pub fn register_components(world: &mut World) {
    world.register::<WindingSlot>();
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::constant::{PHASE_BALANCE_TOLERANCE, PI};
    use crate::magnetic::array::{MagnetArray, MagnetArrayConfig};
    use assert_approx_eq::assert_approx_eq;
    use specs::{Builder, DispatcherBuilder, World};

    #[test]
    fn test_three_phase_is_balanced_for_all_angles() {
        let excitation = WindingExcitation::default();
        for k in 0..1000 {
            let theta = 0.013 * k as f64;
            let currents = excitation.phase_currents(theta);
            let sum = currents.a + currents.b + currents.c;
            assert!(
                sum.abs() < PHASE_BALANCE_TOLERANCE,
                "unbalanced at theta={}: {}",
                theta,
                sum
            );
        }
    }

    #[test]
    fn test_phase_currents_at_zero_angle() {
        let excitation = WindingExcitation::default();
        let currents = excitation.phase_currents(0.0);
        assert_approx_eq!(currents.a, -10.0 * (PI / 3.0).sin(), 1e-9);
        assert_approx_eq!(currents.a, -8.66, 0.005);
        assert_approx_eq!(currents.b, 0.0);
        assert_approx_eq!(currents.c, 8.66, 0.005);
        assert_approx_eq!(currents.a + currents.b + currents.c, 0.0, 1e-9);
    }

    #[test]
    fn test_conductor_layout_geometry() {
        let excitation = WindingExcitation::default();
        let layout = excitation.conductor_layout(0.0);
        assert_eq!(layout.len(), WINDING_CONDUCTORS);

        // forward conductors at +h, mirrored returns at -h
        for (position, _) in &layout[0..3] {
            assert_approx_eq!(position.y, excitation.conductor_height);
        }
        for (position, _) in &layout[3..6] {
            assert_approx_eq!(position.y, -excitation.conductor_height);
        }

        // slots straddle the carriage center at fixed spacing
        assert_approx_eq!(layout[0].0.x, -4.0 - 5.0 / 3.0, 1e-9);
        assert_approx_eq!(layout[5].0.x, -4.0 + 5.0 / 3.0, 1e-9);

        // returns carry the negated phase currents
        let currents = excitation.phase_currents(0.0);
        assert_approx_eq!(layout[0].1, currents.a);
        assert_approx_eq!(layout[3].1, -currents.a);
        assert_approx_eq!(layout[4].1, -currents.b);
        assert_approx_eq!(layout[5].1, -currents.c);
    }

    #[test]
    fn test_carriage_translates_linearly() {
        let excitation = WindingExcitation::default();
        assert_approx_eq!(excitation.carriage_center_x(0.0), -4.0);
        assert_approx_eq!(excitation.carriage_center_x(0.5), 0.0);
        assert_approx_eq!(excitation.carriage_center_x(1.0), 4.0);
    }

    #[test]
    fn test_frame_net_force_is_sum_of_conductor_forces() {
        let array = MagnetArray::build(&MagnetArrayConfig::default()).expect("valid config");
        let excitation = WindingExcitation::default();
        let frame = excitation.frame(0.37, &array);

        let mut total = Vector2::zeros();
        for conductor in &frame.conductors {
            total += conductor.force;
        }
        assert_approx_eq!(frame.net_force.x, total.x, 1e-12);
        assert_approx_eq!(frame.net_force.y, total.y, 1e-12);
    }

    /// The same `t` must produce bitwise-identical frames: no hidden state.
    #[test]
    fn test_frame_is_deterministic() {
        let array = MagnetArray::build(&MagnetArrayConfig::default()).expect("valid config");
        let excitation = WindingExcitation::default();

        let first = excitation.frame(0.61, &array);
        let second = excitation.frame(0.61, &array);

        assert_eq!(first.net_force.x.to_bits(), second.net_force.x.to_bits());
        assert_eq!(first.net_force.y.to_bits(), second.net_force.y.to_bits());
        for (a, b) in first.conductors.iter().zip(second.conductors.iter()) {
            assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
            assert_eq!(a.current.to_bits(), b.current.to_bits());
            assert_eq!(a.force.x.to_bits(), b.force.x.to_bits());
            assert_eq!(a.force.y.to_bits(), b.force.y.to_bits());
        }
    }

    #[test]
    fn test_update_winding_system_applies_layout() {
        let mut test_world = World::new();
        crate::conductor::register_components(&mut test_world);
        crate::magnetic::register_components(&mut test_world);
        register_components(&mut test_world);

        let mut dispatcher = DispatcherBuilder::new()
            .with(UpdateWindingSystem, UPDATE_WINDING_SYSTEM_NAME, &[])
            .build();
        dispatcher.setup(&mut test_world);

        let entities = spawn_winding(&mut test_world);
        test_world.insert(NormalizedTime { t: 0.25 });

        dispatcher.dispatch(&test_world);

        let excitation = WindingExcitation::default();
        let layout = excitation.conductor_layout(0.25);
        let positions = test_world.read_storage::<Position>();
        let currents = test_world.read_storage::<Current>();
        for (slot, entity) in entities.iter().enumerate() {
            let pos = positions.get(*entity).expect("entity not found");
            let current = currents.get(*entity).expect("entity not found");
            assert_eq!(pos.pos, layout[slot].0);
            assert_eq!(current.value, layout[slot].1);
        }
    }
}
