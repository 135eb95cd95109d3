mod catalog;
mod profile;

pub use catalog::WorkoutCatalog;
pub use profile::{Difficulty, IntensityPoint, WorkoutProfile};
