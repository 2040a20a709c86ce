//! Listing photo storage.

pub mod service;

pub use service::{StoredObject, UploadService};
