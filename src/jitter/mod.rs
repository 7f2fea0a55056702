mod displacement;
mod engine;

pub use displacement::{generate_displacement, DisplacementVector, DistanceBand};
pub use engine::{jitter_geometry, jitter_part};
