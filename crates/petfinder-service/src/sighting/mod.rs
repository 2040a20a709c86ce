//! Community sighting reports.

pub mod service;

pub use service::{CreateSightingInput, SightingService};
