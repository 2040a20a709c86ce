//! # petfinder-storage
//!
//! Object storage for listing photos. Supports the local filesystem and
//! S3-compatible object stores, plus the upload policy applied to every
//! image before it is stored.

pub mod manager;
pub mod providers;
pub mod upload;

pub use manager::StorageManager;
pub use upload::{ImagePolicy, ImageUpload, ValidatedImage};
