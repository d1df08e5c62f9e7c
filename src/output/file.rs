//! Writes output files containing per-conductor frame records.

use crate::conductor::{Conductor, Force, Position};
use crate::emf::InducedEmfSampler;
use crate::frame::FrameStep;
use specs::{Component, Entities, Entity, Join, ReadExpect, ReadStorage, System};
use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;

extern crate byteorder;
use byteorder::{LittleEndian, WriteBytesExt};

/// A system that writes simulation data to file.
///
/// This system writes per-conductor data `C` to a file at a defined interval
/// of frames. The data type `C` must be a [Component](specs::Component) and
/// implement the [Clone](std::clone::Clone) trait.
pub struct OutputSystem<C: Component + Clone, W: Write, F: Format<C, W>> {
    /// Number of frames between each file output.
    interval: u64,
    /// The [Write](std::io::Write)able output stream.
    stream: W,
    formatter: PhantomData<F>,
    marker: PhantomData<C>,
}

/// Creates a new [OutputSystem](struct.OutputSystem.html) to write per-conductor
/// [Component](specs::Component) data according to the specified
/// [Format](trait.Format.html).
///
/// The interval specifies how often, in frames, the file should be written.
///
/// For example, `new::<Force, Text>("force.txt".to_string(), 10)`.
pub fn new<C, F>(file_name: String, interval: u64) -> OutputSystem<C, BufWriter<File>, F>
where
    C: Component + Clone,
    F: Format<C, BufWriter<File>>,
{
    let path = Path::new(&file_name);
    let display = path.display();
    let file = match File::create(&path) {
        Err(why) => panic!("couldn't open {}: {}", display, why),
        Ok(file) => file,
    };
    let writer = BufWriter::new(file);
    OutputSystem {
        interval,
        stream: writer,
        formatter: PhantomData,
        marker: PhantomData,
    }
}

impl<'a, C, W, F> System<'a> for OutputSystem<C, W, F>
where
    C: Component + Clone,
    W: Write,
    F: Format<C, W>,
{
    type SystemData = (
        Entities<'a>,
        ReadStorage<'a, C>,
        ReadStorage<'a, Conductor>,
        ReadExpect<'a, FrameStep>,
    );

    fn run(&mut self, (entities, data, conductors, step): Self::SystemData) {
        if step.n % self.interval == 0 {
            let conductor_number = (&conductors).join().count();
            F::write_frame_header(&mut self.stream, step.n, conductor_number);

            // write each conductor
            for (data, _, ent) in (&data, &conductors, &entities).join() {
                F::write_conductor(&mut self.stream, ent, data.clone());
            }
        }
    }
}

/// A trait implemented for each file output format.
pub trait Format<C, W>
where
    C: Component + Clone,
    W: Write,
{
    /// Writes data indicating the start of a frame.
    fn write_frame_header(writer: &mut W, frame: u64, conductor_number: usize);

    /// Writes data associated with a conductor.
    fn write_conductor(writer: &mut W, conductor: Entity, data: C);
}

/// Prints files in a [Format](trait.Format.html) that is human readable.
///
/// Each frame begins with the line `frame n, conductorNumber`, followed by one
/// line `gen,id: data` per conductor, where `gen` and `id` are the
/// [Entity](specs::Entity) generation and id.
///
/// Components printed using text must implement the [Display](std::fmt::Display) trait.
pub struct Text {}
impl<C, W> Format<C, W> for Text
where
    C: Component + Clone + Display,
    W: Write,
{
    fn write_frame_header(writer: &mut W, frame: u64, conductor_number: usize) {
        write!(writer, "frame {:?}, {:?}\n", frame, conductor_number)
            .expect("Could not write to output.");
    }

    fn write_conductor(writer: &mut W, conductor: Entity, data: C) {
        write!(
            writer,
            "{:?},{:?}: {}\n",
            conductor.gen().id(),
            conductor.id(),
            data
        )
        .expect("Could not write to output.");
    }
}

type Endianness = LittleEndian;

/// Implemented by components that can be flattened into binary payloads.
pub trait BinaryConversion {
    fn data(&self) -> Vec<f64>;
}

impl BinaryConversion for Position {
    fn data(&self) -> Vec<f64> {
        vec![self.pos.x, self.pos.y]
    }
}

impl BinaryConversion for Force {
    fn data(&self) -> Vec<f64> {
        vec![self.force.x, self.force.y]
    }
}

impl BinaryConversion for InducedEmfSampler {
    fn data(&self) -> Vec<f64> {
        vec![self.emf]
    }
}

/// Prints files in a little-endian binary format.
pub struct Binary {}
impl<C, W> Format<C, W> for Binary
where
    C: Component + Clone + BinaryConversion,
    W: Write,
{
    fn write_frame_header(writer: &mut W, frame: u64, conductor_number: usize) {
        writer
            .write_u64::<Endianness>(frame)
            .expect("Could not write to file.");
        writer
            .write_u64::<Endianness>(conductor_number as u64)
            .expect("Could not write to file.");
    }

    fn write_conductor(writer: &mut W, conductor: Entity, data: C) {
        writer
            .write_i32::<Endianness>(conductor.gen().id())
            .expect("Could not write to file.");
        writer
            .write_u32::<Endianness>(conductor.id())
            .expect("Could not write to file.");
        for element in data.data() {
            writer
                .write_f64::<Endianness>(element)
                .expect("Could not write to file.")
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::frame::FrameStep;
    use nalgebra::Vector2;
    use specs::{Builder, DispatcherBuilder, World, WorldExt};

    #[test]
    fn test_text_output_writes_conductor_forces() {
        let path = std::env::temp_dir().join("linmag_text_output_test.txt");

        let mut test_world = World::new();
        test_world.register::<Conductor>();
        test_world.register::<Force>();
        test_world.insert(FrameStep { n: 0 });

        test_world
            .create_entity()
            .with(Conductor)
            .with(Force {
                force: Vector2::new(1.0, -2.0),
            })
            .build();

        let mut dispatcher = DispatcherBuilder::new()
            .with(
                new::<Force, Text>(path.to_str().expect("utf8 path").to_string(), 1),
                "output",
                &[],
            )
            .build();
        dispatcher.setup(&mut test_world);
        dispatcher.dispatch(&test_world);
        // dispatcher owns the buffered stream; drop it to flush
        std::mem::drop(dispatcher);

        let contents = std::fs::read_to_string(&path).expect("output file readable");
        std::fs::remove_file(&path).ok();
        assert!(contents.starts_with("frame 0, 1"));
        assert!(contents.contains("1.0,-2.0"));
    }
}
