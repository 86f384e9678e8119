mod particle;
mod polarity;
mod spatial_tree;
mod accumulate;
mod magnetic_force;

pub use particle::*;
pub use polarity::*;
pub use spatial_tree::*;
pub use accumulate::*;
pub use magnetic_force::*;

#[cfg(test)]
mod particle_tests;
