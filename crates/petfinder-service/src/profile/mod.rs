//! Viewing and editing one's own profile.

pub mod service;

pub use service::ProfileService;
