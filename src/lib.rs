#[macro_use]
extern crate specs_derive;
pub mod conductor;
pub mod config;
pub mod constant;
pub mod ecs;
pub mod emf;
pub mod error;
pub mod frame;
pub mod initiate;
pub mod lorentz;
pub mod magnetic;
pub mod output;
pub mod winding;
