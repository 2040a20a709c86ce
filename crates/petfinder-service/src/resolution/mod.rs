//! Closing a listing and crediting whoever found the pet.

pub mod service;

pub use service::{ResolutionService, ResolveInput};
