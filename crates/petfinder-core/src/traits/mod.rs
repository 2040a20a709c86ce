//! Core traits defined in `petfinder-core` and implemented by other crates.

pub mod cache;
pub mod storage;

pub use cache::CacheProvider;
pub use storage::StorageProvider;
