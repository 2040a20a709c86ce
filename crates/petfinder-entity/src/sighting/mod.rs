//! Sighting entity.

pub mod model;

pub use model::{CreateSighting, Sighting};
